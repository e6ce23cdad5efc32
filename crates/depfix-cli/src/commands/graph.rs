//! Handler for `depfix graph`.

use miette::Result;

use depfix_ops::context::Context;
use depfix_ops::ops_graph::{self, GraphFormat, GraphOptions};

use super::EXIT_SUCCESS;
use crate::cli::GraphFormatArg;

pub fn exec(ctx: &Context, format: GraphFormatArg, with_index: bool) -> Result<u8> {
    let opts = GraphOptions {
        format: match format {
            GraphFormatArg::Json => GraphFormat::Json,
            GraphFormatArg::Dot => GraphFormat::Dot,
        },
        with_index,
    };
    let rendered = ops_graph::graph(ctx, &opts)?;
    println!("{}", rendered.trim_end());
    Ok(EXIT_SUCCESS)
}
