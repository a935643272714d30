//! Core math functions

use abacus_plugin::prelude::*;

pub struct Sqrt;
pub struct Ln;
pub struct Log;
pub struct Log10;
pub struct Exp;
pub struct Pow;
pub struct Abs;

static SQRT_ARGS: [ArgMeta; 1] = [ArgMeta::required("x", "Value (must be non-negative)")];
static SQRT_EXAMPLES: [&str; 2] = ["sqrt(2)", "sqrt(16)"];
static SQRT_RELATED: [&str; 2] = ["pow", "exp"];

static LN_ARGS: [ArgMeta; 1] = [ArgMeta::required("x", "Value (must be positive)")];
static LN_EXAMPLES: [&str; 2] = ["ln(e)", "ln(2)"];
static LN_RELATED: [&str; 3] = ["log", "log10", "exp"];

static LOG_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("x", "Value (must be positive)"),
    ArgMeta::optional("base", "Logarithm base", "e"),
];
static LOG_EXAMPLES: [&str; 2] = ["log(e)", "log(8, 2)"];
static LOG_RELATED: [&str; 2] = ["ln", "log10"];

static LOG10_ARGS: [ArgMeta; 1] = [ArgMeta::required("x", "Value (must be positive)")];
static LOG10_EXAMPLES: [&str; 2] = ["log10(1000)", "log10(2)"];
static LOG10_RELATED: [&str; 2] = ["log", "ln"];

static EXP_ARGS: [ArgMeta; 1] = [ArgMeta::required("x", "Exponent")];
static EXP_EXAMPLES: [&str; 2] = ["exp(1)", "exp(0)"];
static EXP_RELATED: [&str; 2] = ["ln", "pow"];

static POW_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("base", "Base value"),
    ArgMeta::required("exponent", "Exponent (non-integer needs a non-negative base)"),
];
static POW_EXAMPLES: [&str; 2] = ["pow(2, 10)", "pow(10, 2.5)"];
static POW_RELATED: [&str; 2] = ["sqrt", "exp"];

static ABS_ARGS: [ArgMeta; 1] = [ArgMeta::required("x", "Value")];
static ABS_EXAMPLES: [&str; 2] = ["abs(-5)", "abs(3.14)"];
static ABS_RELATED: [&str; 0] = [];

impl FunctionPlugin for Sqrt {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "sqrt",
            description: "Square root with arbitrary precision",
            usage: "sqrt(x)",
            args: &SQRT_ARGS,
            examples: &SQRT_EXAMPLES,
            category: "math",
            related: &SQRT_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].sqrt(ctx.precision)?)
    }
}

impl FunctionPlugin for Ln {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ln",
            description: "Natural logarithm",
            usage: "ln(x)",
            args: &LN_ARGS,
            examples: &LN_EXAMPLES,
            category: "math",
            related: &LN_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].ln(ctx.precision)?)
    }
}

impl FunctionPlugin for Log {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "log",
            description: "Natural logarithm, or logarithm in the given base",
            usage: "log(x) | log(x, base)",
            args: &LOG_ARGS,
            examples: &LOG_EXAMPLES,
            category: "math",
            related: &LOG_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        match args.get(1) {
            Some(base) => Ok(args[0].log_base(base, ctx.precision)?),
            None => Ok(args[0].ln(ctx.precision)?),
        }
    }
}

impl FunctionPlugin for Log10 {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "log10",
            description: "Base-10 logarithm",
            usage: "log10(x)",
            args: &LOG10_ARGS,
            examples: &LOG10_EXAMPLES,
            category: "math",
            related: &LOG10_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].log10(ctx.precision)?)
    }
}

impl FunctionPlugin for Exp {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "exp",
            description: "Exponential function (e^x)",
            usage: "exp(x)",
            args: &EXP_ARGS,
            examples: &EXP_EXAMPLES,
            category: "math",
            related: &EXP_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].exp(ctx.precision)?)
    }
}

impl FunctionPlugin for Pow {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "pow",
            description: "Power function, same as base ^ exponent",
            usage: "pow(base, exponent)",
            args: &POW_ARGS,
            examples: &POW_EXAMPLES,
            category: "math",
            related: &POW_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].pow_real(&args[1], ctx.precision)?)
    }
}

impl FunctionPlugin for Abs {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "abs",
            description: "Absolute value",
            usage: "abs(x)",
            args: &ABS_ARGS,
            examples: &ABS_EXAMPLES,
            category: "math",
            related: &ABS_RELATED,
        }
    }

    fn call(&self, args: &[Number], _ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].abs())
    }
}
