//! Typed YAML parsing for peering documents

use serde::de::DeserializeOwned;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse YAML content into `T`, attaching the source document and failing
/// location to any syntax error.
pub fn parse_yaml<T: DeserializeOwned + 'static>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename)))
}

/// Read and parse a YAML file; read failures surface as [`YamlError::Io`]
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &std::path::Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();
    parse_yaml(&content, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeeringDoc;

    #[test]
    fn test_parse_peering_doc() {
        let yaml = r#"
peers:
  east:
    vpc_id: vpc-east
    region: us-east-1
    role_arn: 'arn:aws:iam::111111111111:role/East'
peering_matrix:
  east: []
"#;
        let doc: PeeringDoc = parse_yaml(yaml, "peering.yaml").unwrap();
        assert_eq!(doc.peers.len(), 1);
        assert_eq!(doc.peers["east"].vpc_id, "vpc-east");
        assert!(doc.peering_matrix["east"].is_empty());
    }

    #[test]
    fn test_bad_indentation_is_a_syntax_error() {
        let yaml = "peers:\n  east:\n vpc_id: vpc-east";
        let result: Result<PeeringDoc, _> = parse_yaml(yaml, "peering.yaml");
        assert!(matches!(result, Err(YamlError::Syntax(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result: Result<PeeringDoc, _> =
            parse_yaml_file(std::path::Path::new("/nonexistent/peering.yaml"));
        assert!(matches!(result, Err(YamlError::Io(_))));
    }
}
