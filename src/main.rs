// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Coursemap CLI entrypoint.
//!
//! `layout` compiles a prerequisite AST (JSON, as served by the course API) for a target course
//! and prints the graph elements together with their layout. `schema` prints the JSON schema
//! of the AST format.

use std::error::Error;

use coursemap::compile::ast_to_elements;
use coursemap::layout::{generate_layered_layout, generate_tree_layout};
use coursemap::model::AstNode;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} layout <ast.json> <target-course> [--layered] [--titles] [--animate]\n  {program} schema\n\n`layout` prints `{{\"elements\": [...], \"layout\": {{...}}}}` as JSON.\n--layered uses the plain layered layout instead of the prerequisite tree layout.\n--titles sizes nodes for their course titles instead of their course codes.\n--animate marks the layout as animated."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Layout(LayoutOptions),
    Schema,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct LayoutOptions {
    ast_path: String,
    target: String,
    layered: bool,
    titles: bool,
    animate: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<Command, ()> {
    match args.next().as_deref() {
        Some("schema") => {
            if args.next().is_some() {
                return Err(());
            }
            Ok(Command::Schema)
        }
        Some("layout") => parse_layout_options(args).map(Command::Layout),
        _ => Err(()),
    }
}

fn parse_layout_options(args: impl Iterator<Item = String>) -> Result<LayoutOptions, ()> {
    let mut options = LayoutOptions::default();
    let mut positional = Vec::new();

    for arg in args {
        let flag = match arg.as_str() {
            "--layered" => &mut options.layered,
            "--titles" => &mut options.titles,
            "--animate" => &mut options.animate,
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                positional.push(arg);
                continue;
            }
        };
        if *flag {
            return Err(());
        }
        *flag = true;
    }

    let [ast_path, target]: [String; 2] = positional.try_into().map_err(|_| ())?;
    options.ast_path = ast_path;
    options.target = target;
    Ok(options)
}

fn run_layout(options: &LayoutOptions) -> Result<String, Box<dyn Error>> {
    let raw = std::fs::read_to_string(&options.ast_path)
        .map_err(|err| format!("read {}: {err}", options.ast_path))?;
    let ast: AstNode = serde_json::from_str(&raw)
        .map_err(|err| format!("parse {}: {err}", options.ast_path))?;

    let elements = ast_to_elements(&ast, &options.target);
    let label_is_code = !options.titles;
    let layout = if options.layered {
        generate_layered_layout(options.animate, &elements, label_is_code)?
    } else {
        generate_tree_layout(options.animate, &elements, label_is_code)?
    };

    let output = serde_json::json!({ "elements": elements, "layout": layout });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "coursemap".to_owned());

        let command = match parse_options(args) {
            Ok(command) => command,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let output = match command {
            Command::Schema => serde_json::to_string_pretty(&schemars::schema_for!(AstNode))?,
            Command::Layout(options) => run_layout(&options)?,
        };
        println!("{output}");
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("coursemap: {err}");
        std::process::exit(1);
    }
}
