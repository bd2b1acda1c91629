use crate::service::GitService;
use bytes::{BufMut, BytesMut};

/// Zero-length flush frame. No length prefix semantics, just the literal
/// four bytes.
pub const FLUSH_PKT: &[u8] = b"0000";

/// Frame a payload as a pkt-line: four lower-case hex digits of the total
/// frame length (payload plus the 4-byte prefix itself), then the payload.
pub fn write_pkt_line(data: &str) -> BytesMut {
    let total_len = data.len() + 4;
    // A pkt-line length must fit in 4 hex digits. Unreachable for the
    // fixed service header, guarded anyway.
    debug_assert!(total_len <= 0xffff, "pkt-line payload too long");
    let mut buf = BytesMut::with_capacity(total_len);
    buf.put_slice(format!("{:04x}", total_len).as_bytes());
    buf.put_slice(data.as_bytes());
    buf
}

/// The smart HTTP advertisement preamble for a service: the pkt-line of
/// `# service=git-<name>\n` followed by a flush. Everything after these
/// two frames is opaque bytes from the git subprocess, which emits its
/// own pkt-lines and trailing flush.
pub fn service_header(service: GitService) -> BytesMut {
    let mut buf = write_pkt_line(&format!("# service={}\n", service.wire_name()));
    buf.put_slice(FLUSH_PKT);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkt_line_length_prefix() {
        assert_eq!(&write_pkt_line("a\n")[..], b"0006a\n");
        assert_eq!(
            &write_pkt_line("# service=git-upload-pack\n")[..],
            b"001e# service=git-upload-pack\n"
        );
        assert_eq!(
            &write_pkt_line("# service=git-receive-pack\n")[..],
            b"001f# service=git-receive-pack\n"
        );
    }

    #[test]
    fn test_flush_is_literal() {
        assert_eq!(FLUSH_PKT, b"0000");
    }

    #[test]
    fn test_service_header_ends_with_flush() {
        let header = service_header(GitService::UploadPack);
        assert_eq!(&header[..], b"001e# service=git-upload-pack\n0000");
        let header = service_header(GitService::ReceivePack);
        assert_eq!(&header[..], b"001f# service=git-receive-pack\n0000");
    }
}
