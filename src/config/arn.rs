//! Account-ID extraction from IAM role ARNs

/// Extract the AWS account ID from a role ARN.
///
/// ARNs are colon-delimited with the account segment at index 4
/// (`arn:aws:iam::123456789012:role/Name`). Any other shape returns `None`;
/// callers treat that as "unknown account" rather than an error, so a
/// malformed ARN degrades to an empty owner field downstream.
pub fn account_id_from_role_arn(role_arn: &str) -> Option<&str> {
    let account = role_arn.split(':').nth(4)?;
    if account.is_empty() || !account.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_arn() {
        assert_eq!(
            account_id_from_role_arn("arn:aws:iam::123456789012:role/MyRole"),
            Some("123456789012")
        );
    }

    #[test]
    fn test_arn_with_missing_account() {
        assert_eq!(account_id_from_role_arn("arn:aws:iam::role/MyRole"), None);
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(account_id_from_role_arn(""), None);
    }

    #[test]
    fn test_too_few_segments() {
        assert_eq!(account_id_from_role_arn("arn:aws:iam:123456789012"), None);
    }

    #[test]
    fn test_non_numeric_account() {
        assert_eq!(account_id_from_role_arn("arn:aws:iam::abc:role/X"), None);
    }
}
