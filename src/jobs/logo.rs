//! Company name to domain guessing, used to pick a logo image.
//! No requests are made here; the URLs are just built

use regex::Regex;
use reqwest::Url;
use std::sync::OnceLock;

const KNOWN_DOMAINS: &[(&str, &str)] = &[
    ("google", "google.com"),
    ("microsoft", "microsoft.com"),
    ("apple", "apple.com"),
    ("amazon", "amazon.com"),
    ("meta", "meta.com"),
    ("facebook", "facebook.com"),
    ("netflix", "netflix.com"),
    ("spotify", "spotify.com"),
    ("twitter", "twitter.com"),
    ("linkedin", "linkedin.com"),
    ("uber", "uber.com"),
    ("airbnb", "airbnb.com"),
    ("stripe", "stripe.com"),
    ("shopify", "shopify.com"),
    ("slack", "slack.com"),
    ("zoom", "zoom.us"),
    ("salesforce", "salesforce.com"),
    ("adobe", "adobe.com"),
    ("oracle", "oracle.com"),
    ("ibm", "ibm.com"),
    ("intel", "intel.com"),
    ("cisco", "cisco.com"),
    ("nvidia", "nvidia.com"),
    ("paypal", "paypal.com"),
    ("dropbox", "dropbox.com"),
    ("atlassian", "atlassian.com"),
    ("github", "github.com"),
    ("gitlab", "gitlab.com"),
    ("notion", "notion.so"),
    ("figma", "figma.com"),
    ("canva", "canva.com"),
    ("hubspot", "hubspot.com"),
    ("mailchimp", "mailchimp.com"),
    ("twilio", "twilio.com"),
    ("datadog", "datadoghq.com"),
    ("snowflake", "snowflake.com"),
    ("mongodb", "mongodb.com"),
    ("cloudflare", "cloudflare.com"),
    ("vercel", "vercel.com"),
    ("supabase", "supabase.com"),
    ("openai", "openai.com"),
    ("anthropic", "anthropic.com"),
    ("bt group", "bt.com"),
    ("lloyds banking group", "lloydsbank.com"),
    ("lloyds", "lloydsbank.com"),
    ("barclays", "barclays.co.uk"),
    ("hsbc", "hsbc.co.uk"),
    ("natwest", "natwest.com"),
    ("virgin media", "virginmedia.com"),
    ("bbc", "bbc.co.uk"),
    ("itv", "itv.com"),
    ("tesco", "tesco.com"),
    ("sainsburys", "sainsburys.co.uk"),
    ("sainsbury's", "sainsburys.co.uk"),
    ("marks & spencer", "marksandspencer.com"),
    ("m&s", "marksandspencer.com"),
    ("boots", "boots.com"),
    ("asos", "asos.com"),
    ("deliveroo", "deliveroo.co.uk"),
    ("just eat", "just-eat.co.uk"),
    ("monzo", "monzo.com"),
    ("revolut", "revolut.com"),
    ("wise", "wise.com"),
    ("transferwise", "wise.com"),
    ("starling bank", "starlingbank.com"),
    ("starling", "starlingbank.com"),
    ("chelsea football club", "chelseafc.com"),
    ("arsenal", "arsenal.com"),
    ("manchester united", "manutd.com"),
    ("tottenham", "tottenhamhotspur.com"),
    ("siena ai", "siena.cx"),
    ("tripadvisor", "tripadvisor.com"),
    ("viator", "viator.com"),
    ("attio", "attio.com"),
    ("blackrock", "blackrock.com"),
    ("capital on tap", "capitalontap.com"),
    ("fremantle uk", "fremantle.com"),
    ("fremantle", "fremantle.com"),
    ("turnitin", "turnitin.com"),
    ("deblock", "deblock.com"),
    ("xtremepush", "xtremepush.com"),
    ("urban jungle insurance", "ujinsurance.co.uk"),
    ("urban jungle", "ujinsurance.co.uk"),
    ("sogeti", "sogeti.com"),
    ("experis uk", "experis.com"),
    ("experis", "experis.com"),
    ("axiumai", "axium.ai"),
];

// Short or common words that would match far too much as substrings
const EXACT_ONLY: &[(&str, &str)] = &[
    ("x", "x.com"),
    ("bt", "bt.com"),
    ("sky", "sky.com"),
    ("wpp", "wpp.com"),
    ("stream", "getstream.io"),
    ("moss", "getmoss.com"),
    ("propel", "propel.me"),
];

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";
const AVATAR_COLORS: [&str; 7] = ["1f95ea", "10b981", "f59e0b", "ef4444", "8b5cf6", "ec4899", "06b6d4"];

fn suffix_regex() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| Regex::new(
        r"(?i)\s*(ltd|limited|inc|incorporated|corp|corporation|llc|plc|group|uk|us|international|global)\.?\s*$"
    ).unwrap())
}

fn non_alnum_regex() -> &'static Regex {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9\s]").unwrap())
}

/// Best guess at a company's web domain
pub fn guess_domain(company: &str) -> Option<String> {
    let normalized = company.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let exact = KNOWN_DOMAINS.iter().chain(EXACT_ONLY.iter())
        .find(|(name, _)| *name == normalized);
    if let Some((_, domain)) = exact {
        return Some(domain.to_string());
    }

    let partial = KNOWN_DOMAINS.iter()
        .find(|(name, _)| normalized.contains(name) || name.contains(normalized.as_str()));
    if let Some((_, domain)) = partial {
        return Some(domain.to_string());
    }

    let cleaned = suffix_regex().replace(&normalized, "");
    let cleaned: String = non_alnum_regex().replace_all(&cleaned, "")
        .split_whitespace()
        .collect();

    if cleaned.len() > 2 {
        return Some(format!("{cleaned}.com"));
    }
    None
}

pub fn favicon_url(domain: &str, size: u32) -> String {
    format!("https://www.google.com/s2/favicons?domain={domain}&sz={size}")
}

/// Generated initials image, used when no domain can be guessed
pub fn avatar_url(company: &str, size: u32) -> String {
    let initials: String = company.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase();
    let color_index = company.chars().map(|c| c as usize).sum::<usize>() % AVATAR_COLORS.len();

    let size = size.to_string();
    let params = [
        ("name", initials.as_str()),
        ("size", size.as_str()),
        ("background", AVATAR_COLORS[color_index]),
        ("color", "fff"),
        ("bold", "true"),
        ("format", "svg")
    ];
    match Url::parse_with_params(AVATAR_BASE_URL, &params) {
        Ok(url) => url.to_string(),
        Err(err) => {
            log::error!("Could not build avatar url for {}: {}", company, err);
            AVATAR_BASE_URL.to_string()
        }
    }
}

/// Logo for a job card: the stored domain wins over a guess
pub fn logo_url(company: &str, domain: Option<&str>) -> String {
    let domain = domain
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string)
        .or_else(|| guess_domain(company));

    match domain {
        Some(domain) => favicon_url(&domain, 128),
        None => avatar_url(company, 128)
    }
}
