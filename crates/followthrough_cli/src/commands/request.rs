use anyhow::{bail, Result};
use clap::Args;
use followthrough_api::{handle, ApiConfig, ApiRequest};

use super::Context;
use crate::output::format::print_json;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method
    pub method: String,
    /// Path with optional query, e.g. `/api/followups?status=waiting`
    pub target: String,
    /// JSON request body
    #[arg(long, default_value = "")]
    pub body: String,
    /// Extra header as `Name: value`; repeatable
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,
}

pub fn run(args: &RequestArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let mut request = ApiRequest::new(&args.method, &args.target).with_body(args.body.clone());
    for raw in &args.headers {
        let Some((name, value)) = raw.split_once(':') else {
            bail!("Header `{raw}` must look like `Name: value`");
        };
        request = request.with_header(name.trim(), value.trim());
    }
    if request.header("Authorization").is_none() {
        if let Some(api_key) = ctx.api_key() {
            request = request.with_header("Authorization", &format!("Bearer {api_key}"));
        }
    }

    let response = handle(&conn, &ApiConfig::from_env(), &request, ctx.today);
    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": response.status,
            "body": response.body,
        })),
        OutputFormat::Text => {
            println!("{}", response.status);
            println!("{}", response.body_text());
            Ok(())
        }
    }
}
