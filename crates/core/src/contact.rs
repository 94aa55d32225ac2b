//! Family contacts and the children they are linked to.

use serde::{Deserialize, Serialize};
use crate::id::{ChildId, ContactId};

/// A contact with the children it is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Backend identifier
    pub id: ContactId,

    /// Display name
    pub name: String,

    /// Relationship to the family ("grandparent", "coach", ...)
    #[serde(default)]
    pub relationship: Option<String>,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,

    /// Linked children
    #[serde(default)]
    pub children: Vec<ChildRef>,
}

/// A child as referenced from another record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    /// Backend identifier
    pub id: ChildId,

    /// Child's name
    pub name: String,
}

/// A contact as returned by the backend: children are nested through the
/// `contact_children` junction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRow {
    /// Backend identifier
    pub id: ContactId,

    /// Display name
    pub name: String,

    /// Relationship
    #[serde(default)]
    pub relationship: Option<String>,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,

    /// Junction rows
    #[serde(default)]
    pub contact_children: Vec<ContactChildLink>,
}

/// One row of the contact/child junction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactChildLink {
    /// The joined child; null when the child row was deleted or not visible
    #[serde(default)]
    pub child: Option<ChildRef>,
}

impl ContactRow {
    /// Flatten the junction rows into a child list.
    ///
    /// Links without a child are dropped and each child appears once, in
    /// first-seen order.
    pub fn into_contact(self) -> Contact {
        let mut children: Vec<ChildRef> = Vec::with_capacity(self.contact_children.len());
        for child in self.contact_children.into_iter().filter_map(|link| link.child) {
            if !children.iter().any(|c| c.id == child.id) {
                children.push(child);
            }
        }

        Contact {
            id: self.id,
            name: self.name,
            relationship: self.relationship,
            phone: self.phone,
            email: self.email,
            children,
        }
    }
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        row.into_contact()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattens_junction_rows() {
        let json = r#"{
            "id": "ct-1",
            "name": "Grandma Jo",
            "relationship": "grandparent",
            "contact_children": [
                { "child": { "id": "k1", "name": "Ada" } },
                { "child": null },
                { "child": { "id": "k2", "name": "Ben" } },
                { "child": { "id": "k1", "name": "Ada" } }
            ]
        }"#;
        let row: ContactRow = serde_json::from_str(json).unwrap();
        let contact = row.into_contact();

        assert_eq!(contact.name, "Grandma Jo");
        assert_eq!(contact.relationship.as_deref(), Some("grandparent"));
        let names: Vec<_> = contact.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Ben"]);
    }

    #[test]
    fn test_missing_junction_means_no_children() {
        let row: ContactRow = serde_json::from_str(r#"{"id": "ct-2", "name": "Coach"}"#).unwrap();
        let contact: Contact = row.into();
        assert!(contact.children.is_empty());
        assert!(contact.phone.is_none());
    }
}
