/// How far into a blob git looks for a NUL byte when guessing binary content.
const BINARY_PROBE_LEN: usize = 8000;

/// A git blob: raw file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// A blob is simply its raw bytes.
    pub fn parse(content: &[u8]) -> Self {
        Self {
            data: content.to_vec(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Git's heuristic: binary if a NUL appears in the first 8000 bytes.
    pub fn is_binary(&self) -> bool {
        let probe = &self.data[..self.data.len().min(BINARY_PROBE_LEN)];
        probe.contains(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_binary() {
        assert!(!Blob::new(b"hello world\n".to_vec()).is_binary());
        assert!(Blob::new(b"hello\0world".to_vec()).is_binary());
        assert!(!Blob::new(Vec::new()).is_binary());
    }

    #[test]
    fn nul_past_probe_window_is_text() {
        let mut data = vec![b'a'; BINARY_PROBE_LEN];
        data.push(0);
        let blob = Blob::new(data);
        assert!(!blob.is_binary());
        assert_eq!(blob.size(), BINARY_PROBE_LEN + 1);
    }
}
