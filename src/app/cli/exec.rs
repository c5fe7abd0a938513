use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde_json::json;

use crate::app::api;
use crate::domain::AppError;

pub fn run_exec(config: &Path, request: Option<&Path>) -> Result<(), AppError> {
    let raw = match request {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)?,
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let request = api::parse_request(&raw)?;
    let (headers, response) = api::run_request_at(config, &request)?;
    println!("{}", json!({ "headers": headers, "response": response }));
    Ok(())
}
