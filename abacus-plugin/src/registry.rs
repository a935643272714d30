//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use abacus_core::{AbacusError, Number};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Definition of a built-in constant
#[derive(Debug, Clone)]
pub struct ConstantDef {
    pub name: String,
    pub description: String,
    /// Computes the constant at the requested precision
    pub compute: fn(u32) -> Number,
}

impl ConstantDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>, compute: fn(u32) -> Number) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            compute,
        }
    }

    pub fn value(&self, precision: u32) -> Number {
        (self.compute)(precision)
    }
}

/// Central function and constant registry
///
/// Immutable once built; share it through `Arc`.
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
    constants: HashMap<String, ConstantDef>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            constants: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn with_constant(mut self, def: ConstantDef) -> Self {
        let name = def.name.to_lowercase();
        self.constants.insert(name, def);
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    pub fn get_constant(&self, name: &str) -> Option<&ConstantDef> {
        self.constants.get(&name.to_lowercase())
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains_key(&name.to_lowercase())
    }

    /// Error for a name that is not a registered function, with close matches
    pub fn unknown_function(&self, name: &str) -> AbacusError {
        let similar = self.find_similar_functions(name);
        let mut err = AbacusError::undefined_func(name);
        if !similar.is_empty() {
            let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
            err = err.with_suggestion(format!("Similar: {}", suggestions.join(", ")));
        }
        err
    }

    pub fn call_function(&self, name: &str, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        let f = self.get_function(name).ok_or_else(|| self.unknown_function(name))?;
        f.meta().check_arity(args.len())?;
        f.call(args, ctx)
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                (score > 0).then(|| (func_name.clone(), score))
            })
            .collect();

        // Higher first, ties alphabetical so suggestions are stable
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        score += common * 2;

        let len_diff = query.chars().count().abs_diff(candidate.chars().count());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    /// Function metadata, sorted by name
    pub fn list_functions(&self) -> Vec<FunctionMeta> {
        let mut metas: Vec<FunctionMeta> = self.functions.values().map(|f| f.meta()).collect();
        metas.sort_by(|a, b| a.name.cmp(b.name));
        metas
    }

    /// Constants, sorted by name
    pub fn list_constants(&self) -> Vec<&ConstantDef> {
        let mut defs: Vec<&ConstantDef> = self.constants.values().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn help(&self, name: Option<&str>) -> Result<Value, AbacusError> {
        match name {
            Some(n) => self.help_for(n),
            None => Ok(self.general_help()),
        }
    }

    fn help_for(&self, name: &str) -> Result<Value, AbacusError> {
        if let Some(f) = self.get_function(name) {
            let mut help = serde_json::to_value(f.meta())
                .map_err(|e| AbacusError::new("HELP", e.to_string()))?;
            help["type"] = json!("function");
            return Ok(help);
        }
        if let Some(c) = self.get_constant(name) {
            return Ok(json!({
                "name": c.name,
                "type": "constant",
                "description": c.description,
            }));
        }
        Err(AbacusError::new("NOT_FOUND", format!("No function or constant named '{}'", name))
            .with_suggestion("Run without a name for the full list"))
    }

    fn general_help(&self) -> Value {
        let mut by_category: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for meta in self.list_functions() {
            by_category.entry(meta.category).or_default().push(meta.name);
        }
        let constants: Vec<&str> = self.list_constants().into_iter().map(|c| c.name.as_str()).collect();

        json!({
            "functions": by_category,
            "constants": constants,
            "usage": "Ask for help on a single name for arguments and examples.",
        })
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
