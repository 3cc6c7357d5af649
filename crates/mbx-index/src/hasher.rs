use mbx_frame::FramedMessage;
use mbx_types::Digest;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so digests from different record kinds never collide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for mbox messages.
    pub const MESSAGE: Self = Self {
        domain: "mbx-message-v1",
    };

    /// Fingerprint a framed message.
    ///
    /// Input is the whitelisted header lines joined by `\n`, then the body
    /// lines joined by `\n`. Each part is length-prefixed so content cannot
    /// shift between header and body. The boundary line, the remaining
    /// headers, and the byte offset play no part.
    pub fn hash_message(&self, message: &FramedMessage) -> Digest {
        let mut hasher = self.start();
        update_lines(&mut hasher, &message.headers);
        update_lines(&mut hasher, &message.body);
        Digest::from_hash(*hasher.finalize().as_bytes())
    }

    fn start(&self) -> blake3::Hasher {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher
    }
}

fn update_lines(hasher: &mut blake3::Hasher, lines: &[Vec<u8>]) {
    let separators = lines.len().saturating_sub(1);
    let len = lines.iter().map(Vec::len).sum::<usize>() + separators;
    hasher.update(&(len as u64).to_le_bytes());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(line);
    }
}
