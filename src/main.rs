//! briefpress – command-line letter renderer.
//!
//! Usage:
//!   briefpress <template.html> <recipient.json> [output.pdf]
//!             [--base-url URL] [--title TITLE] [--intro TEXT]
//!
//! If `output.pdf` is omitted the PDF is written to the current directory
//! under the recipient's suggested filename (`<Last>_<Company>_<token>.pdf`).

use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

use briefpress::letter::{letter_filename, Recipient};
use briefpress::pipeline::{generate_letter_pdf, LetterConfig};
use briefpress::LetterError;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut template_path: Option<PathBuf> = None;
    let mut recipient_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut base_url: Option<String> = None;
    let mut title: Option<String> = None;
    let mut intro: Option<String> = None;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--base-url" | "-b" => base_url = iter.next().cloned(),
            "--title" | "-t" => title = iter.next().cloned(),
            "--intro" | "-i" => intro = iter.next().cloned(),
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                match positional {
                    0 => template_path = Some(PathBuf::from(path)),
                    1 => recipient_path = Some(PathBuf::from(path)),
                    2 => output_path = Some(PathBuf::from(path)),
                    _ => {
                        eprintln!("Unexpected argument: {path}");
                        print_usage(&args[0]);
                        process::exit(1);
                    }
                }
                positional += 1;
            }
        }
    }

    let (Some(template_path), Some(recipient_path)) = (template_path, recipient_path) else {
        eprintln!("Error: template and recipient files are required.");
        print_usage(&args[0]);
        process::exit(1);
    };

    let html = match fs::read_to_string(&template_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", template_path.display());
            process::exit(1);
        }
    };

    let recipient = match load_recipient(&recipient_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", recipient_path.display());
            process::exit(1);
        }
    };

    let output = output_path.unwrap_or_else(|| PathBuf::from(letter_filename(&recipient)));

    let mut config = LetterConfig::default();
    if let Some(url) = base_url {
        config.base_url = url;
    }
    config.title = title.unwrap_or_else(|| format!("Letter {}", recipient.full_name()));

    match generate_letter_pdf(&html, &recipient, intro.as_deref(), &config) {
        Ok(bytes) => {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = fs::create_dir_all(parent) {
                        eprintln!("Error creating output directory: {e}");
                        process::exit(1);
                    }
                }
            }
            if let Err(e) = fs::write(&output, &bytes) {
                eprintln!("Error writing '{}': {e}", output.display());
                process::exit(1);
            }
            eprintln!("Wrote '{}' ({} bytes)", output.display(), bytes.len());
        }
        Err(e) => {
            eprintln!("Error generating letter: {e}");
            process::exit(1);
        }
    }
}

fn load_recipient(path: &Path) -> Result<Recipient, LetterError> {
    let json = fs::read_to_string(path)?;
    Recipient::from_json(&json)
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {program} <template.html> <recipient.json> [output.pdf] \
         [--base-url URL] [--title TITLE] [--intro TEXT]"
    );
}
