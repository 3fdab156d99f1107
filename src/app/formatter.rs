use crate::app::models::Digest;
use std::path::Path;

pub struct OutputGenerator;

impl OutputGenerator {
    /// 16 uppercase hex digits, most significant first.
    pub fn digest_to_hex(digest: Digest) -> String {
        format!("{:016X}", digest)
    }

    /// One `HEX  input` line per input.
    pub fn generate_breakdown(results: &[(&Path, Digest)]) -> String {
        let mut output = String::new();

        for (input, digest) in results {
            output.push_str(&format!(
                "{}  {}\n",
                Self::digest_to_hex(*digest),
                input.display()
            ));
        }

        output.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_padded_uppercase() {
        assert_eq!(OutputGenerator::digest_to_hex(0), "0000000000000000");
        assert_eq!(
            OutputGenerator::digest_to_hex(0xEF46_DB37_51D8_E999),
            "EF46DB3751D8E999"
        );
        assert_eq!(OutputGenerator::digest_to_hex(0xab), "00000000000000AB");
    }

    #[test]
    fn breakdown_lists_each_input() {
        let out = OutputGenerator::generate_breakdown(&[
            (Path::new("src"), 1),
            (Path::new("layout.txt"), u64::MAX),
        ]);
        assert_eq!(
            out,
            "0000000000000001  src\nFFFFFFFFFFFFFFFF  layout.txt"
        );
    }
}
