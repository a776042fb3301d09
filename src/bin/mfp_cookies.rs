//! Cookie conversion utility for the MyFitnessPal MCP server.
//!
//! Turns a cookie list exported from a logged-in browser into the
//! `MFP_COOKIES` variable the server reads, for hosts with no browser.
//!
//! Usage:
//! ```bash
//! # Write .env next to the exported mfp_cookies.json
//! cargo run --bin mfp-cookies
//!
//! # Custom paths
//! cargo run --bin mfp-cookies -- --input ~/Downloads/cookies.json --output deploy/.env
//!
//! # Print the variable instead of writing a file
//! cargo run --bin mfp-cookies -- --print
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;

use mfp_mcp_server::domains::diary::CookieStore;
use mfp_mcp_server::domains::diary::cookies::SESSION_COOKIE_NAMES;

/// Characters of each session cookie shown in the preview.
const PREVIEW_LEN: usize = 20;

#[derive(Parser)]
#[command(
    name = "mfp-cookies",
    about = "Convert exported MyFitnessPal cookies into an MFP_COOKIES env file",
    version
)]
struct CookieArgs {
    /// Cookie list exported from the browser
    #[arg(long, short = 'i', default_value = "mfp_cookies.json")]
    input: PathBuf,

    /// Env file to write
    #[arg(long, short = 'o', default_value = ".env")]
    output: PathBuf,

    /// Print the MFP_COOKIES line to stdout instead of writing a file
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    let args = CookieArgs::parse();

    let store = CookieStore::from_export_file(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let Some(store) = store else {
        bail!(
            "No cookies found in {}. Export them from a browser logged into MyFitnessPal.",
            args.input.display()
        );
    };

    eprintln!("Found {} cookies", store.len());

    if args.print {
        println!("{}", env_line(&store));
    } else {
        std::fs::write(&args.output, env_file_contents(&store))
            .with_context(|| format!("Failed to write {}", args.output.display()))?;
        eprintln!("Saved cookies to {}", args.output.display());
    }

    let previews = session_previews(&store);
    if !previews.is_empty() {
        eprintln!("\nKey cookies found:");
        for line in previews {
            eprintln!("  - {}", line);
        }
    }

    eprintln!("\nThese cookies grant access to your account. Keep the file out of version control.");
    eprintln!("Sessions expire after about 30 days; export and run this again when they do.");

    Ok(())
}

fn env_line(store: &CookieStore) -> String {
    format!("MFP_COOKIES={}", store.to_env_json())
}

fn env_file_contents(store: &CookieStore) -> String {
    format!(
        "# MyFitnessPal Cookies (extracted from browser)\n\
         # Use this for deployment without browser access\n\n\
         {}\n",
        env_line(store)
    )
}

/// `name: prefix...` for each known session cookie present in `store`.
fn session_previews(store: &CookieStore) -> Vec<String> {
    SESSION_COOKIE_NAMES
        .iter()
        .filter_map(|name| store.get(name))
        .map(|cookie| {
            let prefix: String = cookie.value.chars().take(PREVIEW_LEN).collect();
            format!("{}: {}...", cookie.name, prefix)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> CookieStore {
        CookieStore::from_export_json(
            r#"[
                {"name": "_mfp_session", "value": "abcdefghijklmnopqrstuvwxyz", "domain": ".myfitnesspal.com", "path": "/", "secure": true},
                {"name": "tracking", "value": "x"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_env_file_layout() {
        let contents = env_file_contents(&sample_store());
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "# MyFitnessPal Cookies (extracted from browser)");
        assert_eq!(lines[1], "# Use this for deployment without browser access");
        assert_eq!(lines[2], "");
        assert!(lines[3].starts_with("MFP_COOKIES={"));
        assert!(contents.ends_with("}\n"));
    }

    #[test]
    fn test_env_line_loads_back() {
        let line = env_line(&sample_store());
        let json = line.strip_prefix("MFP_COOKIES=").unwrap();
        let store = CookieStore::from_env_json(Some(json)).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get("_mfp_session").unwrap().secure);
    }

    #[test]
    fn test_previews_only_session_cookies() {
        let previews = session_previews(&sample_store());
        assert_eq!(previews, vec!["_mfp_session: abcdefghijklmnopqrst...".to_string()]);
    }

    #[test]
    fn test_default_arguments() {
        let args = CookieArgs::parse_from(["mfp-cookies"]);
        assert_eq!(args.input, PathBuf::from("mfp_cookies.json"));
        assert_eq!(args.output, PathBuf::from(".env"));
        assert!(!args.print);
    }
}
