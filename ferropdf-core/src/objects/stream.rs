/// Raw stream bytes owned by a dictionary.
///
/// The bytes are stored exactly as they will be written (the "filtered"
/// view). The owning dictionary keeps its `/Length` entry in sync and knows
/// how to produce the unfiltered view through the filter registry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stream {
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn into_data(self) -> Vec<u8> {
        self.data
    }
}
