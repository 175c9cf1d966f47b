#![cfg(feature = "gui")]
//! Demo window entrypoint.

fn main() {
    if let Err(err) = codeblock::gui::run() {
        eprintln!("codeblock demo failed: {}", err);
        std::process::exit(1);
    }
}
