pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a command's JSON document from `--input`, falling back to piped
/// stdin. `what` names the document in the error when neither is given.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Err(format!("--input file (or piped JSON) is required for {what}").into()),
    }
}
