use mailparse::{MailAddr, addrparse};

/// Decode RFC 2047 encoded-words in a header value (e.g. attachment names).
pub fn decode_mime_words(raw: &str) -> String {
    // mailparse expects a full "Key: value" header line
    let mut line = b"X: ".to_vec();
    line.extend_from_slice(raw.as_bytes());
    line.extend_from_slice(b"\r\n");

    match mailparse::parse_header(&line) {
        Ok((h, _idx)) => h.get_value(),
        Err(_) => raw.to_string(),
    }
}

/// Bare address of the first mailbox in a `From` header.
/// Falls back to the trimmed raw value when the header is not a valid list.
pub fn sender_address(from: &str) -> String {
    let first = addrparse(from).ok().and_then(|list| {
        list.iter().find_map(|addr| match addr {
            MailAddr::Single(info) => Some(info.addr.clone()),
            MailAddr::Group(group) => group.addrs.first().map(|info| info.addr.clone()),
        })
    });

    first.unwrap_or_else(|| from.trim().to_string())
}
