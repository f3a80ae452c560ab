/// Declared attributes of the `kind` resource
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub attributes: Vec<Attribute>,
}

#[cfg(test)]
impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

const fn computed(name: &'static str, description: &'static str) -> Attribute {
    Attribute {
        name,
        kind: AttributeType::String,
        description,
        required: false,
        optional: false,
        computed: true,
        force_new: false,
    }
}

/// Schema of the `kind` resource
pub fn kind_cluster_schema() -> ResourceSchema {
    ResourceSchema {
        type_name: "kind",
        attributes: vec![
            Attribute {
                name: "name",
                kind: AttributeType::String,
                description: "Name of the 'kind' cluster",
                required: true,
                optional: false,
                computed: false,
                force_new: true,
            },
            Attribute {
                name: "config",
                kind: AttributeType::String,
                description: "Configuration file for the 'kind' cluster",
                required: false,
                optional: true,
                computed: false,
                force_new: true,
            },
            computed(
                "client_certificate",
                "Public certificate used by clients to authenticate to the cluster endpoint.",
            ),
            computed(
                "client_key",
                "Private key used by clients to authenticate to the cluster endpoint.",
            ),
            computed(
                "cluster_ca_certificate",
                "Public certificate that is the root of trust for the cluster.",
            ),
            computed("host", "Endpoint that can be used to reach API server"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_force_replacement() {
        let schema = kind_cluster_schema();
        assert!(schema.attribute("name").unwrap().required);
        assert!(schema.attribute("name").unwrap().force_new);
        assert!(schema.attribute("config").unwrap().optional);
        assert!(schema.attribute("config").unwrap().force_new);
    }

    #[test]
    fn test_outputs_are_computed() {
        let schema = kind_cluster_schema();
        for name in ["host", "client_certificate", "client_key", "cluster_ca_certificate"] {
            let attr = schema.attribute(name).unwrap();
            assert!(attr.computed && !attr.required && !attr.force_new, "{}", name);
        }
    }

    #[test]
    fn test_schema_serializes_type_field() {
        let json = serde_json::to_value(kind_cluster_schema()).unwrap();
        assert_eq!(json["type_name"], "kind");
        assert_eq!(json["attributes"][0]["type"], "string");
    }
}
