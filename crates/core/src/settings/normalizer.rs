//! Interpretation of the loosely-typed `verify_ssl` setting.

use std::path::PathBuf;

use serde_json::Value;
use wooledger_domain::VerifyDirective;

const BUNDLE_EXTENSIONS: [&str; 4] = [".pem", ".crt", ".cer", ".der"];
const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];

/// Maps whatever an operator stored for `verify_ssl` onto a directive.
///
/// Total: unknown shapes fall back to [`VerifyDirective::Secure`].
///
/// | raw | directive |
/// |---|---|
/// | absent / `null` | `Secure` |
/// | string with `/` or `\`, or a `.pem/.crt/.cer/.der` suffix | `CustomBundle` |
/// | other string | `Secure` if `1/true/yes/on` (any case), else `Insecure` |
/// | bool / integer | truthiness |
/// | anything else | `Secure` |
pub fn normalize_verify(raw: Option<&Value>) -> VerifyDirective {
    match raw {
        None | Some(Value::Null) => VerifyDirective::Secure,
        Some(Value::String(text)) => normalize_text(text),
        Some(Value::Bool(flag)) => secure_if(*flag),
        Some(Value::Number(number)) => {
            if let Some(int) = number.as_i64() {
                secure_if(int != 0)
            } else if let Some(uint) = number.as_u64() {
                secure_if(uint != 0)
            } else {
                VerifyDirective::Secure
            }
        }
        Some(_) => VerifyDirective::Secure,
    }
}

fn normalize_text(text: &str) -> VerifyDirective {
    let trimmed = text.trim();
    if looks_like_bundle_path(trimmed) {
        return VerifyDirective::CustomBundle(PathBuf::from(trimmed));
    }
    let lowered = trimmed.to_lowercase();
    secure_if(TRUTHY.contains(&lowered.as_str()))
}

fn looks_like_bundle_path(text: &str) -> bool {
    if text.contains('/') || text.contains('\\') {
        return true;
    }
    let lowered = text.to_lowercase();
    BUNDLE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

fn secure_if(flag: bool) -> VerifyDirective {
    if flag {
        VerifyDirective::Secure
    } else {
        VerifyDirective::Insecure
    }
}
