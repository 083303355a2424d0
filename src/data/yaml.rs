//! YAML processing utilities

use anyhow::{Context, Result};
use serde::Serialize;
use yaml_rust_davvid::YamlEmitter;

/// Serialize data structure to a YAML document with multi-line string support
pub fn to_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    let serde_value = serde_yaml::to_value(data).context("Failed to serialize to serde value")?;
    let yaml_rust_value = convert_serde_to_yaml_rust(&serde_value)?;

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(true);
    emitter
        .dump(&yaml_rust_value)
        .context("Failed to emit YAML")?;

    Ok(output)
}

/// Serialize data structure to YAML without the `---` document marker,
/// for embedding in surrounding text
pub fn to_yaml_block<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    let document = to_yaml(data)?;
    let body = document.strip_prefix("---").unwrap_or(&document);
    Ok(body.trim().to_string())
}

/// Convert serde_yaml::Value to yaml_rust_davvid::Yaml
fn convert_serde_to_yaml_rust(value: &serde_yaml::Value) -> Result<yaml_rust_davvid::Yaml> {
    use yaml_rust_davvid::Yaml;

    match value {
        serde_yaml::Value::Null => Ok(Yaml::Null),
        serde_yaml::Value::Bool(b) => Ok(Yaml::Boolean(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Yaml::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Yaml::Real(f.to_string()))
            } else {
                Ok(Yaml::String(n.to_string()))
            }
        }
        serde_yaml::Value::String(s) => Ok(Yaml::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let yaml_seq: Result<Vec<_>> = seq.iter().map(convert_serde_to_yaml_rust).collect();
            Ok(Yaml::Array(yaml_seq?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut yaml_map = yaml_rust_davvid::yaml::Hash::new();
            for (k, v) in map {
                let yaml_key = convert_serde_to_yaml_rust(k)?;
                let yaml_value = convert_serde_to_yaml_rust(v)?;
                yaml_map.insert(yaml_key, yaml_value);
            }
            Ok(Yaml::Hash(yaml_map))
        }
        serde_yaml::Value::Tagged(tagged) => convert_serde_to_yaml_rust(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    #[test]
    fn block_has_no_document_marker() {
        let rules = vec![Rule::new("r1", "first"), Rule::new("r2", "second")];
        let block = to_yaml_block(&rules).unwrap();
        assert!(!block.starts_with("---"));
        assert!(block.starts_with("- id: r1"));
        assert!(block.contains("- id: r2"));
        assert!(!block.ends_with('\n'));
    }

    #[test]
    fn block_keeps_field_order() {
        let rule = Rule::new("r1", "desc").new_files_only();
        let block = to_yaml_block(&[rule]).unwrap();
        let id = block.find("id:").unwrap();
        let description = block.find("description:").unwrap();
        let new_only = block.find("enforce_on_new_only:").unwrap();
        assert!(id < description && description < new_only);
    }
}
