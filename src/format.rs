//! Stream reformatter - single-pass re-indentation of response text
//!
//! This is not a JSON parser. It walks the input once and re-emits it with
//! tab indentation around `{}[]`, a line break after `,` and a space after
//! `:`. Whitespace outside strings is dropped, so already formatted input
//! collapses and gets re-laid out the same way. Malformed input is passed
//! through on a best-effort basis; the function never fails.

/// Reformat raw response bytes into an indented layout.
pub fn reformat(input: &[u8]) -> Vec<u8> {
    // Roughly one extra byte per structural character in typical payloads.
    let mut out = Vec::with_capacity(input.len() + input.len() / 2);
    let mut indent = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for &b in input {
        if in_string {
            out.push(b);
            if escape {
                escape = false;
            } else if b == b'\\' {
                escape = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => {
                in_string = true;
                out.push(b);
            }
            b'{' | b'[' => {
                out.push(b);
                out.push(b'\n');
                indent += 1;
                push_indent(&mut out, indent);
            }
            b'}' | b']' => {
                out.push(b'\n');
                indent = indent.saturating_sub(1);
                push_indent(&mut out, indent);
                out.push(b);
            }
            b',' => {
                out.push(b);
                out.push(b'\n');
                push_indent(&mut out, indent);
            }
            b':' => {
                out.push(b);
                out.push(b' ');
            }
            b' ' | b'\t' | b'\r' | b'\n' => {}
            _ => out.push(b),
        }
    }

    out
}

/// Reformat and decode for display. Invalid UTF-8 is replaced, not rejected.
pub fn reformat_lossy(input: &[u8]) -> String {
    match String::from_utf8(reformat(input)) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn push_indent(out: &mut Vec<u8>, indent: usize) {
    out.extend(std::iter::repeat(b'\t').take(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(input: &str) -> String {
        String::from_utf8(reformat(input.as_bytes())).unwrap()
    }

    #[test]
    fn formats_nested_object() {
        assert_eq!(
            fmt(r#"{"a":1,"b":[2,3]}"#),
            "{\n\t\"a\": 1,\n\t\"b\": [\n\t\t2,\n\t\t3\n\t]\n}"
        );
    }

    #[test]
    fn unbalanced_closers_stay_at_zero_indent() {
        let out = fmt("]]]");
        assert_eq!(out, "\n]\n]\n]");
        let lines: Vec<&str> = out.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["]", "]", "]"]);
    }

    #[test]
    fn indent_recovers_after_underflow() {
        // The floor means a later opener starts from zero again.
        assert_eq!(fmt("]{1}"), "\n]{\n\t1\n}");
    }

    #[test]
    fn structural_bytes_inside_strings_are_untouched() {
        assert_eq!(fmt(r#"{"k":"a,b:c"}"#), "{\n\t\"k\": \"a,b:c\"\n}");
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        assert_eq!(
            fmt(r#"{"k":"say \"hi\", {x}"}"#),
            "{\n\t\"k\": \"say \\\"hi\\\", {x}\"\n}"
        );
    }

    #[test]
    fn escaped_backslash_before_quote_ends_string() {
        // "a\\" is a complete string; the comma after it is structural.
        assert_eq!(fmt(r#"["a\\",1]"#), "[\n\t\"a\\\\\",\n\t1\n]");
    }

    #[test]
    fn whitespace_inside_strings_is_kept() {
        assert_eq!(fmt("{ \"a b\" : \"c\td\" }"), "{\n\t\"a b\": \"c\td\"\n}");
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        assert_eq!(fmt(r#"{"open: [1, 2"#), "{\n\t\"open: [1, 2");
    }

    #[test]
    fn plain_text_only_loses_whitespace() {
        assert_eq!(fmt("hello world\r\n"), "helloworld");
        assert_eq!(fmt(""), "");
    }

    #[test]
    fn multibyte_text_passes_through() {
        assert_eq!(fmt(r#"{"名前":"ß→✓"}"#), "{\n\t\"名前\": \"ß→✓\"\n}");
    }

    #[test]
    fn lossy_decoding_replaces_invalid_bytes() {
        let out = reformat_lossy(b"[\xff]");
        assert_eq!(out, "[\n\t\u{fffd}\n]");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let samples = [
            r#"{"a":1,"b":[2,3]}"#,
            r#"{"users":[{"id":1,"tags":["x","y"]},{"id":2,"tags":[]}],"ok":true}"#,
            r#"[[[]]]"#,
            r#"{"k":"a,b:c","esc":"q\"{"}"#,
            "]]{\"x\":[1",
        ];
        for sample in samples {
            let once = reformat(sample.as_bytes());
            let twice = reformat(&once);
            assert_eq!(once, twice, "not idempotent for {sample}");
        }
    }

    #[test]
    fn well_formed_json_keeps_its_meaning() {
        let raw = r#"{ "a" : [1, 2.5, -3e2], "b" : { "c" : null, "d" : "x y" }, "e" : false }"#;
        let pretty = reformat(raw.as_bytes());
        let before: serde_json::Value = serde_json::from_str(raw).unwrap();
        let after: serde_json::Value = serde_json::from_slice(&pretty).unwrap();
        assert_eq!(before, after);
    }
}
