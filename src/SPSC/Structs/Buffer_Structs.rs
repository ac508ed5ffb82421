// Owned records handed back to consumers

use std::ops::Deref;

/// One command popped from the queue.
///
/// The bytes are a copy; the slot they came from is already free for the
/// producer by the time a `Record` exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    payload: Vec<u8>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.payload
    }
}

impl From<Vec<u8>> for Record {
    fn from(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

impl Deref for Record {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.payload
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.payload
    }
}
