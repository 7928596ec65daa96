use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use anyhow::Context;
use contrast_evaluator::{NTupleNetwork, PatternSet};

/// Writes `value` as pretty-printed JSON to `path`, or to stdout when no path
/// is given.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let Some(path) = path else {
        return write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout");
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_json(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))
}

fn write_json<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {} JSON file: {}", file_kind, path.display()))?;

    Ok(value)
}

/// Loads weights for a network built from `patterns`.
pub fn load_network<P>(path: P, patterns: PatternSet) -> anyhow::Result<NTupleNetwork>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut network = NTupleNetwork::with_pattern_set(patterns);
    network
        .load(path)
        .with_context(|| format!("Failed to load {patterns} weights: {}", path.display()))?;
    Ok(network)
}

/// Parses a kind name, accepting `rule-based` and `rule_based` for `RuleBased`.
pub fn parse_kind<T>(s: &str) -> Result<T, T::Err>
where
    T: FromStr,
{
    s.replace(['-', '_'], "").parse()
}
