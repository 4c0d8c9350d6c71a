//! `tessel generic`: composite blocks from project files.

use std::path::Path;

use tessel_blocks::{CompositeSource, Position, Size};

use crate::report::{finish, status};
use crate::settings::builder;
use crate::{GenericArgs, GlobalArgs};

/// Runs the `tessel generic` command.
///
/// Reads the project file, infers the composite's ports from its nested
/// design and prints the descriptor. Returns exit code 1 if the file lacks
/// the sections needed to infer ports.
pub fn run(args: &GenericArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let builder = builder(global)?;
    let path = Path::new(&args.file);
    let type_name = match &args.type_name {
        Some(name) => name.clone(),
        None => type_name_from_path(path),
    };

    status(global, "Reading", &args.file);
    let source = CompositeSource::from_json(&std::fs::read_to_string(path)?)?;
    let pinned = args
        .width
        .zip(args.height)
        .map(|(width, height)| Size::new(width, height));

    status(global, "Building", &type_name);
    let result = builder.new_generic(&type_name, &source, Position::default(), pinned);
    finish(result, global)
}

/// The file stem, which project files use as the composite's type name.
fn type_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "generic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_is_file_stem() {
        assert_eq!(type_name_from_path(Path::new("lib/adder4.ice")), "adder4");
        assert_eq!(type_name_from_path(Path::new("")), "generic");
    }
}
