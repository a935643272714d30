//! Trigonometric functions
//!
//! Arguments are radians. Degree input reaches these functions already
//! converted by the evaluator (`sin(90 deg)`).

use abacus_plugin::prelude::*;

pub struct Sin;
pub struct Cos;
pub struct Tan;

static ANGLE_ARGS: [ArgMeta; 1] = [ArgMeta::required("x", "Angle in radians (tag with `deg` for degrees)")];

static SIN_EXAMPLES: [&str; 3] = ["sin(0)", "sin(pi/2)", "sin(30 deg)"];
static SIN_RELATED: [&str; 2] = ["cos", "tan"];

static COS_EXAMPLES: [&str; 3] = ["cos(0)", "cos(pi)", "cos(60 deg)"];
static COS_RELATED: [&str; 2] = ["sin", "tan"];

static TAN_EXAMPLES: [&str; 2] = ["tan(0)", "tan(pi/4)"];
static TAN_RELATED: [&str; 2] = ["sin", "cos"];

impl FunctionPlugin for Sin {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "sin",
            description: "Sine function",
            usage: "sin(x)",
            args: &ANGLE_ARGS,
            examples: &SIN_EXAMPLES,
            category: "trig",
            related: &SIN_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].sin(ctx.precision)?)
    }
}

impl FunctionPlugin for Cos {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "cos",
            description: "Cosine function",
            usage: "cos(x)",
            args: &ANGLE_ARGS,
            examples: &COS_EXAMPLES,
            category: "trig",
            related: &COS_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].cos(ctx.precision)?)
    }
}

impl FunctionPlugin for Tan {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "tan",
            description: "Tangent function",
            usage: "tan(x)",
            args: &ANGLE_ARGS,
            examples: &TAN_EXAMPLES,
            category: "trig",
            related: &TAN_RELATED,
        }
    }

    fn call(&self, args: &[Number], ctx: &EvalContext) -> Result<Number, AbacusError> {
        Ok(args[0].tan(ctx.precision)?)
    }
}
