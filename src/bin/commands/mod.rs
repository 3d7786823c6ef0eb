pub mod config;
pub mod init;
pub mod load;
pub mod serve;
pub mod show;

/// Print a serializable value in a JSON output format
pub(crate) fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing output: {}", e),
    }
}
