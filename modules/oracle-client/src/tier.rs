use signaldesk_common::constants::{
    OFFICIAL_DOMAINS, TIER1_MEDIA_DOMAINS, TIER2_MEDIA_DOMAINS,
};
use signaldesk_common::SourceTier;

/// Resolve a URL to its source tier via the domain whitelists.
/// Unknown hosts and unparseable URLs fall through to community.
pub fn url_tier(raw: &str) -> SourceTier {
    let Ok(parsed) = url::Url::parse(raw) else {
        return SourceTier::Community;
    };
    let Some(host) = parsed.host_str() else {
        return SourceTier::Community;
    };

    if matches_any(host, OFFICIAL_DOMAINS) {
        SourceTier::Official
    } else if matches_any(host, TIER1_MEDIA_DOMAINS) {
        SourceTier::Tier1Media
    } else if matches_any(host, TIER2_MEDIA_DOMAINS) {
        SourceTier::Tier2Media
    } else {
        SourceTier::Community
    }
}

fn matches_any(host: &str, domains: &[&str]) -> bool {
    domains
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn official_domain_is_tier_one() {
        assert_eq!(
            url_tier("https://binance.com/announcement"),
            SourceTier::Official
        );
        assert_eq!(
            url_tier("https://www.sec.gov/news/press-release"),
            SourceTier::Official
        );
    }

    #[test]
    fn media_tiers_resolve() {
        assert_eq!(
            url_tier("https://coindesk.com/markets/story"),
            SourceTier::Tier1Media
        );
        assert_eq!(
            url_tier("https://odaily.news/post/1"),
            SourceTier::Tier2Media
        );
    }

    #[test]
    fn unknown_and_garbage_fall_to_community() {
        assert_eq!(url_tier("https://t.me/somechannel"), SourceTier::Community);
        assert_eq!(url_tier("not a url"), SourceTier::Community);
    }

    #[test]
    fn subdomain_does_not_spoof_suffix() {
        // evil-binance.com must not match binance.com
        assert_eq!(
            url_tier("https://evil-binance.com/x"),
            SourceTier::Community
        );
        assert_eq!(
            url_tier("https://announcements.binance.com/x"),
            SourceTier::Official
        );
    }
}
