/// Upper-case, space-separated byte pairs: `[0x0a, 0xff]` -> `"0A FF"`.
pub fn hex_dump(bytes: &[u8]) -> String {
    let encoded = hex::encode_upper(bytes);
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, pair) in encoded.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // hex output is pure ASCII
        out.push(pair[0] as char);
        out.push(pair[1] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_pairs() {
        assert_eq!(hex_dump(&[0x0a, 0xff, 0x10]), "0A FF 10");
        assert_eq!(hex_dump(&[0x00]), "00");
        assert_eq!(hex_dump(&[]), "");
    }
}
