use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(CustomerId);

/// A customer record as held by the form: either a persisted list item
/// (`id` present) or a draft that has not been saved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    pub name: String,
    pub address: String,
    pub rig_count: u32,
    pub jack_up_count: u32,
    pub modu_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

impl Customer {
    /// Site URL as sent to the list: an empty string means "no value".
    pub fn normalized_site_url(&self) -> Option<&str> {
        self.site_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// One entry of the customer selector: identifier and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOption {
    pub id: CustomerId,
    pub label: String,
}

impl CustomerOption {
    pub fn for_records(records: &[Customer]) -> Vec<Self> {
        records
            .iter()
            .filter_map(|record| {
                record.id.map(|id| Self {
                    id,
                    label: record.name.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(id: i64, name: &str) -> Customer {
        Customer {
            id: Some(CustomerId(id)),
            name: name.to_string(),
            address: "1 Dock Rd".to_string(),
            ..Customer::default()
        }
    }

    #[test]
    fn empty_site_url_normalizes_to_none() {
        let mut customer = persisted(1, "Acme");
        customer.site_url = Some(String::new());
        assert_eq!(customer.normalized_site_url(), None);

        customer.site_url = Some("https://acme.example".to_string());
        assert_eq!(customer.normalized_site_url(), Some("https://acme.example"));
    }

    #[test]
    fn name_match_ignores_case() {
        let customer = persisted(1, "Acme Drilling");
        assert!(customer.name_matches("ACME drilling"));
        assert!(!customer.name_matches("Acme"));
    }

    #[test]
    fn options_follow_record_order() {
        let records = vec![persisted(9, "Zeta"), persisted(2, "Alpha")];
        let options = CustomerOption::for_records(&records);
        assert_eq!(
            options,
            vec![
                CustomerOption {
                    id: CustomerId(9),
                    label: "Zeta".to_string()
                },
                CustomerOption {
                    id: CustomerId(2),
                    label: "Alpha".to_string()
                },
            ]
        );
    }
}
