use miette::Result;
use sqlrest_core::Client;

use crate::{output::print_output, utils::parse_param};

pub fn run_query(
    client: &Client,
    script: &str,
    params: &[String],
    export: bool,
    destination: Option<&str>,
    json: bool,
) -> Result<()> {
    let accessor = client.queries(script)?;
    let mut query = if export {
        accessor.export()
    } else {
        accessor.list()
    };

    for param in params {
        let (key, value) = parse_param(param)?;
        query = query.param(key, value);
    }

    print_output(query.execute()?, json, destination)
}
