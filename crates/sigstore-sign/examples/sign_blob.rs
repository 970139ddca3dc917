//! Example: Sign a file with Sigstore keyless signing
//!
//! # Usage
//!
//! ```sh
//! cargo run -p sigstore-sign --example sign_blob -- \
//!     --token "$SIGSTORE_ID_TOKEN" \
//!     artifact.txt -o artifact.sigstore.json
//! ```
//!
//! Without `--token` the token is read from `SIGSTORE_ID_TOKEN`. Pass
//! `--type <TYPE>` to produce a DSSE envelope instead of a message signature.

use sigstore_oidc::IdentityToken;
use sigstore_sign::{Artifact, SigningConfig, SigningContext, StaticIdentityProvider};

use std::env;
use std::fs;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let mut token: Option<String> = None;
    let mut output: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut staging = false;
    let mut tsa = false;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--token" | "-t" | "--output" | "-o" | "--type" => {
                let flag = args[i].clone();
                i += 1;
                let Some(value) = args.get(i).cloned() else {
                    eprintln!("Error: {} requires a value", flag);
                    process::exit(1);
                };
                match flag.as_str() {
                    "--token" | "-t" => token = Some(value),
                    "--output" | "-o" => output = Some(value),
                    _ => content_type = Some(value),
                }
            }
            "--staging" => staging = true,
            "--tsa" => tsa = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with('-') => positional.push(arg.to_string()),
            unknown => {
                eprintln!("Error: Unknown option: {}", unknown);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    if positional.len() != 1 {
        eprintln!("Error: Expected exactly 1 positional argument (file path)");
        print_usage(&args[0]);
        process::exit(1);
    }
    let path = &positional[0];
    let output_path = output.unwrap_or_else(|| format!("{}.sigstore.json", path));

    let Some(token) = token.or_else(|| env::var("SIGSTORE_ID_TOKEN").ok()) else {
        eprintln!("Error: no identity token, pass --token or set SIGSTORE_ID_TOKEN");
        process::exit(1);
    };
    match IdentityToken::from_jwt(&token) {
        Ok(t) => println!("Identity: {} ({})", t.identity().unwrap_or("?"), t.issuer()),
        Err(e) => {
            eprintln!("Error: invalid identity token: {}", e);
            process::exit(1);
        }
    }

    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading '{}': {}", path, e);
            process::exit(1);
        }
    };

    let mut config = if staging {
        SigningConfig::staging()
    } else {
        SigningConfig::production()
    };
    if tsa {
        config = config.with_tsa(if staging {
            sigstore_sign::config::STAGING_TSA_URL
        } else {
            sigstore_sign::config::PRODUCTION_TSA_URL
        });
    }
    println!("Fulcio URL: {}", config.fulcio_url);

    let context = SigningContext::with_config(config);
    let identity = Arc::new(StaticIdentityProvider::new(token));

    let result = match content_type {
        Some(content_type) => {
            let artifact = Artifact::new(data).with_type(content_type);
            match context.dsse_bundler(identity) {
                Ok(bundler) => bundler.create(&artifact).await,
                Err(e) => Err(e),
            }
        }
        None => {
            let artifact = Artifact::new(data);
            match context.message_bundler(identity) {
                Ok(bundler) => bundler.create(&artifact).await,
                Err(e) => Err(e),
            }
        }
    };
    let bundle = match result {
        Ok(bundle) => bundle,
        Err(e) => {
            match e.code() {
                Some(code) => eprintln!("Error signing ({}): {}", code, e),
                None => eprintln!("Error signing: {}", e),
            }
            process::exit(1);
        }
    };

    let json = match bundle.to_json_pretty() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing bundle: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = fs::write(&output_path, json) {
        eprintln!("Error writing '{}': {}", output_path, e);
        process::exit(1);
    }

    println!("Bundle: {}", output_path);
    println!("  Media Type: {}", bundle.media_type);
    for entry in &bundle.verification_material.tlog_entries {
        println!(
            "  Log Entry: {} v{} at index {}",
            entry.kind_version.kind, entry.kind_version.version, entry.log_index
        );
    }
    let timestamps = bundle
        .verification_material
        .timestamp_verification_data
        .rfc3161_timestamps
        .len();
    if timestamps > 0 {
        println!("  RFC3161 Timestamps: {}", timestamps);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <FILE>", program);
    eprintln!();
    eprintln!("Sign a file and write a Sigstore bundle.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <FILE>  Output bundle path (default: <file>.sigstore.json)");
    eprintln!("  -t, --token <TOKEN>  OIDC identity token (default: $SIGSTORE_ID_TOKEN)");
    eprintln!("      --type <TYPE>    Sign a DSSE envelope with this payload type");
    eprintln!("      --tsa            Also request an RFC 3161 timestamp");
    eprintln!("      --staging        Use Sigstore staging infrastructure");
    eprintln!("  -h, --help           Print this help message");
}
