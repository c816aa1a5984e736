// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
                        _ _                  _
  ____ ____   ___  ____(_|_)     ____ ____  | | ____ _   _
 / _  )    \ / _ \| _  | | |____/ ___) _  )| |/ _  | | | |
( (/ /| | | | |_| | (_| | | |___| |  ( (/ / | ( ( | | |_| |
 \____)_|_|_|\___/ \____|_|     |_|   \____)|_|\_||_|\__  |
                        |_|                         (____/

    Emoji Translation Backend with Model Racing
"#;
    println!("{}", banner);
}
