//! Address record definitions.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store.
pub type AddressId = u64;

/// A stored contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub first: String,
    pub last: String,
    pub email: String,
    pub phone: String,
}

/// The client-writable part of an [`Address`].
///
/// Missing fields bind as empty strings. Unknown fields, including a
/// client-supplied `id`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressFields {
    pub first: String,
    pub last: String,
    pub email: String,
    pub phone: String,
}

impl AddressFields {
    /// Attach an id, producing a stored record.
    pub fn into_address(self, id: AddressId) -> Address {
        Address {
            id,
            first: self.first,
            last: self.last,
            email: self.email,
            phone: self.phone,
        }
    }
}

impl From<Address> for AddressFields {
    fn from(address: Address) -> Self {
        Self {
            first: address.first,
            last: address.last,
            email: address.email,
            phone: address.phone,
        }
    }
}

impl Address {
    /// Overwrite every text field wholesale. The id is left alone.
    pub fn replace_fields(&mut self, fields: AddressFields) {
        self.first = fields.first;
        self.last = fields.last;
        self.email = fields.email;
        self.phone = fields.phone;
    }
}
