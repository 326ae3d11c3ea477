//! User mention tags as Discord renders them.

/// Mention tag for a user id, e.g. `<@1234>`.
pub fn user_tag(user_id: u64) -> String {
    format!("<@{user_id}>")
}

/// Nickname-style mention that older mobile clients send, e.g. `<@!1234>`.
pub fn user_tag_mobile(user_id: u64) -> String {
    format!("<@!{user_id}>")
}

/// Space-separated mentions for several users.
pub fn user_tags(user_ids: &[u64], mobile: bool) -> String {
    let tag = if mobile {
        user_tag_mobile
    } else {
        user_tag
    };
    user_ids.iter().map(|id| tag(*id)).collect::<Vec<_>>().join(" ")
}

/// Whether `text` mentions `user_id` in either tag style.
pub fn mentions(text: &str, user_id: u64) -> bool {
    text.contains(&user_tag(user_id)) || text.contains(&user_tag_mobile(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_both_tag_styles() {
        assert_eq!(user_tag(80351110224678912), "<@80351110224678912>");
        assert_eq!(user_tag_mobile(42), "<@!42>");
    }

    #[test]
    fn joins_several_users() {
        assert_eq!(user_tags(&[1, 2, 3], false), "<@1> <@2> <@3>");
        assert_eq!(user_tags(&[7], true), "<@!7>");
        assert_eq!(user_tags(&[], false), "");
    }

    #[test]
    fn detects_mentions_from_any_client() {
        assert!(mentions("hey <@!42> check entries", 42));
        assert!(mentions("<@42>", 42));
        assert!(!mentions("<@420>", 42));
    }
}
