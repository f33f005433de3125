// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Bundle command implementation.
//!
//! Inlines the relative-import graph of a JavaScript/TypeScript entrypoint
//! into a single file, dependencies first, each module once. Bare and remote
//! specifiers (`npm:...`, `https://...`, package names) are outside this
//! tool's business and pass through untouched, as do the statements that
//! import them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use regex::Regex;

use skiff::error::{CliError, Result};

use crate::cli::{BundleArgs, Cli};

/// Extensions probed when a relative specifier does not name a file exactly.
const PROBE_EXTENSIONS: &[&str] = &[".ts", ".js", ".tsx", ".jsx"];

pub async fn run(args: &BundleArgs, cli: &Cli) -> Result<()> {
    let bundle = Bundler::bundle(&args.entrypoint)?;

    let output = args.output.clone().unwrap_or_else(|| {
        let stem = args
            .entrypoint
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bundle".to_string());
        args.entrypoint.with_file_name(format!("{stem}.bundle.js"))
    });
    std::fs::write(&output, &bundle.source)?;

    if !cli.quiet {
        println!(
            "{} {} module(s) into {}",
            "Bundled".green().bold(),
            bundle.module_count,
            output.display()
        );
    }
    Ok(())
}

/// A finished bundle.
#[derive(Debug)]
pub struct Bundle {
    /// The concatenated source.
    pub source: String,
    /// Number of modules inlined, the entrypoint included.
    pub module_count: usize,
}

/// One recognized import statement.
struct ImportStatement {
    start: usize,
    end: usize,
    specifier: String,
}

pub struct Bundler {
    visited: HashSet<PathBuf>,
    out: String,
}

impl Bundler {
    /// Bundle `entrypoint` and everything reachable through relative imports.
    pub fn bundle(entrypoint: &Path) -> Result<Bundle> {
        let entry = entrypoint.canonicalize().map_err(|e| {
            CliError::Bundle(format!("cannot resolve '{}': {e}", entrypoint.display()))
        })?;

        let mut bundler = Self {
            visited: HashSet::new(),
            out: String::new(),
        };
        bundler.out.push_str(&banner(&entry));
        bundler.inline_module(&entry)?;

        Ok(Bundle {
            module_count: bundler.visited.len(),
            source: bundler.out,
        })
    }

    fn inline_module(&mut self, path: &Path) -> Result<()> {
        // Cycles and diamonds: each module is emitted exactly once, the
        // first time it is reached.
        if !self.visited.insert(path.to_path_buf()) {
            return Ok(());
        }

        let source = std::fs::read_to_string(path)
            .map_err(|e| CliError::Bundle(format!("cannot read '{}': {e}", path.display())))?;
        let imports = find_imports(&source);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        // Dependencies go above the module that needs them.
        for import in &imports {
            if is_relative(&import.specifier) {
                let resolved = resolve_relative(dir, &import.specifier)?;
                self.inline_module(&resolved)?;
            }
        }

        self.out
            .push_str(&format!("\n// --- module: {} ---\n", path.display()));

        // Emit the body minus the inlined import statements.
        let mut cursor = 0;
        for import in &imports {
            if is_relative(&import.specifier) {
                self.out.push_str(&source[cursor..import.start]);
                cursor = import.end;
            }
        }
        self.out.push_str(&source[cursor..]);
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        Ok(())
    }
}

fn banner(entry: &Path) -> String {
    format!(
        "// Bundled by skiff v{} from {}\n// Generated file; do not edit.\n",
        skiff::VERSION,
        entry.display()
    )
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Find `import`/`export ... from` statements and bare `import "..."`
/// side-effect statements. Statements are recognized at the start of a line;
/// dynamic `import()` expressions are left alone.
fn find_imports(source: &str) -> Vec<ImportStatement> {
    static FROM_RE: OnceLock<Regex> = OnceLock::new();
    static BARE_RE: OnceLock<Regex> = OnceLock::new();

    let from_re = FROM_RE.get_or_init(|| {
        Regex::new(
            r#"(?ms)^[ \t]*(?:import|export)\b[^;'"]*?\bfrom[ \t]*["']([^"'\n]+)["'][ \t]*;?[ \t]*$"#,
        )
        .expect("static regex")
    });
    let bare_re = BARE_RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*import[ \t]+["']([^"'\n]+)["'][ \t]*;?[ \t]*$"#)
            .expect("static regex")
    });

    let mut imports: Vec<ImportStatement> = Vec::new();
    for re in [from_re, bare_re] {
        for captures in re.captures_iter(source) {
            let whole = captures.get(0).expect("match group 0");
            let specifier = captures.get(1).expect("match group 1");
            imports.push(ImportStatement {
                start: whole.start(),
                end: whole.end(),
                specifier: specifier.as_str().to_string(),
            });
        }
    }
    imports.sort_by_key(|import| import.start);
    imports
}

/// Resolve a relative specifier against `dir`, probing the usual source
/// extensions when the literal path does not exist.
fn resolve_relative(dir: &Path, specifier: &str) -> Result<PathBuf> {
    let literal = dir.join(specifier);
    if literal.is_file() {
        return canonical(&literal);
    }
    for extension in PROBE_EXTENSIONS {
        let candidate = dir.join(format!("{specifier}{extension}"));
        if candidate.is_file() {
            return canonical(&candidate);
        }
    }
    Err(CliError::Bundle(format!(
        "cannot resolve '{specifier}' from '{}'",
        dir.display()
    )))
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|e| CliError::Bundle(format!("cannot resolve '{}': {e}", path.display())))
}
