use crate::models::PlayerProfile;
use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static HEIGHT_WEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+-\d+),\s*(\d+)lb\s*\((\d+)cm,\s*(\d+)kg\)").expect("height pattern is valid")
});
static BIRTH_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+ \d+, \d{4})").expect("birth date pattern is valid"));
static BIRTH_PLACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"in (.*?)(?:,|\(|$)").expect("birth place pattern is valid"));
static DRAFT_PICK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:st|nd|rd|th) round \((\d+)(?:st|nd|rd|th) pick, (\d+)(?:st|nd|rd|th) overall\)")
        .expect("draft pattern is valid")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("year pattern is valid"));
static RANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("rank pattern is valid"));

/// Pulls biographical details off a basketball-reference player page
pub struct PlayerProfileScraper {
    client: reqwest::Client,
}

impl PlayerProfileScraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .build()
                .unwrap_or_default(),
        }
    }

    /// Raw HTML of a player page
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let html = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch player page")?
            .error_for_status()
            .context("Player page returned an error status")?
            .text()
            .await?;
        Ok(html)
    }

    /// Fetch a player page and parse it
    pub async fn fetch_profile(&self, url: &str) -> Result<PlayerProfile> {
        parse_profile(&self.fetch_page(url).await?)
    }
}

impl Default for PlayerProfileScraper {
    fn default() -> Self {
        Self::new()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .ok()
        .with_context(|| format!("Invalid selector {}", css))
}

/// Element text with runs of whitespace collapsed to single spaces
fn collapsed_text(elem: &ElementRef) -> String {
    elem.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn after<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.split_once(label).map(|(_, rest)| rest.trim())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse the `#meta` block of a player page. A page without one gives an empty profile.
pub fn parse_profile(html: &str) -> Result<PlayerProfile> {
    let document = Html::parse_document(html);
    let meta_selector = selector("div#meta")?;
    let name_selector = selector("h1")?;
    let p_selector = selector("p")?;
    let a_selector = selector("a")?;

    let mut profile = PlayerProfile::default();
    let Some(meta) = document.select(&meta_selector).next() else {
        return Ok(profile);
    };

    if let Some(h1) = meta.select(&name_selector).next() {
        profile.full_name = non_empty(&collapsed_text(&h1));
    }

    for p in meta.select(&p_selector) {
        let text = collapsed_text(&p);
        let links: Vec<(String, String)> = p
            .select(&a_selector)
            .map(|a| {
                (
                    a.value().attr("href").unwrap_or("").to_string(),
                    collapsed_text(&a),
                )
            })
            .collect();
        let first_link = links.first().and_then(|(_, label)| non_empty(label));
        let link_to = |fragment: &str| {
            links
                .iter()
                .find(|(href, _)| href.to_lowercase().contains(fragment))
                .and_then(|(_, label)| non_empty(label))
        };

        if let Some(handle) = link_to("instagram") {
            profile.instagram = Some(handle);
        }

        if text.starts_with('(') && text.ends_with(')') {
            profile.nicknames = text[1..text.len() - 1]
                .split(',')
                .filter_map(non_empty)
                .collect();
        }

        if let Some(position) = after(&text, "Position:") {
            let position = position
                .split(|c: char| c == '•' || c == '▪')
                .next()
                .unwrap_or(position);
            profile.position = non_empty(position);
        }

        if let Some(shoots) = after(&text, "Shoots:") {
            profile.shoots = non_empty(shoots);
        }

        if let Some(caps) = HEIGHT_WEIGHT_RE.captures(&text) {
            profile.height_ft_in = Some(caps[1].to_string());
            profile.weight_lb = Some(caps[2].to_string());
            profile.height_cm = Some(caps[3].to_string());
            profile.weight_kg = Some(caps[4].to_string());
        }

        if !text.contains("Draft:") {
            if let Some(team) = link_to("/teams/") {
                profile.team = Some(team);
            }
        }

        if let Some(born) = after(&text, "Born:") {
            profile.birth_date = BIRTH_DATE_RE.captures(born).map(|c| c[1].to_string());
            profile.birth_place = BIRTH_PLACE_RE
                .captures(born)
                .and_then(|c| non_empty(&c[1]));
        }

        if text.contains("College:") {
            profile.college = first_link.clone();
        }

        if let Some(school) = after(&text, "High School:") {
            match school.split_once(" in ") {
                Some((name, location)) => {
                    profile.high_school = non_empty(name);
                    profile.high_school_location = non_empty(location);
                }
                None => profile.high_school = non_empty(school),
            }
        }

        if let Some(rank) = after(&text, "Recruiting Rank:") {
            profile.recruiting_rank_year = YEAR_RE.find(rank).map(|m| m.as_str().to_string());
            profile.recruiting_rank = RANK_RE.captures(rank).map(|c| c[1].to_string());
        }

        if let Some(draft) = after(&text, "Draft:") {
            profile.draft_team = link_to("/teams/");
            if let Some(caps) = DRAFT_PICK_RE.captures(draft) {
                profile.draft_round = Some(caps[1].to_string());
                profile.draft_pick = Some(caps[2].to_string());
                profile.draft_overall = Some(caps[3].to_string());
            }
            profile.draft_year = links
                .iter()
                .find(|(href, _)| href.contains("/draft/"))
                .and_then(|(_, label)| YEAR_RE.find(label))
                .map(|m| m.as_str().to_string());
        }

        if text.contains("NBA Debut:") {
            profile.nba_debut = first_link.clone();
        }

        if let Some(experience) = after(&text, "Experience:") {
            profile.experience = experience.split(' ').next().and_then(non_empty);
        }
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_PAGE: &str = r#"
<html><body>
<div id="meta">
  <div>
    <h1><span>Anthony Davis</span></h1>
    <p><strong>Instagram</strong>: <a href="https://www.instagram.com/antdavis23">antdavis23</a></p>
    <p>(The Brow, Unibrow)</p>
    <p>
      <strong>Position:</strong>
      Power Forward and Center
      &#9642;
      <strong>Shoots:</strong>
      Right
    </p>
    <p><span>6-10</span>,&nbsp;<span>253lb</span>&nbsp;(208cm,&nbsp;114kg) </p>
    <p><strong>Team</strong>: <a href="/teams/DAL/2025.html">Dallas Mavericks</a></p>
    <p>
      <strong>Born: </strong>
      <span id="necro-birth">March 11, 1993</span>
      <span> in&nbsp;Chicago,&nbsp;Illinois</span>
    </p>
    <p><strong>College:</strong> <a href="/friv/colleges.fcgi?college=kentucky">Kentucky</a></p>
    <p><strong>High School:</strong> Perspectives Charter in Chicago, Illinois</p>
    <p><strong>Recruiting Rank:</strong> 2011 (1)</p>
    <p>
      <strong>Draft:</strong>
      <a href="/teams/NOH/draft.html">New Orleans Hornets</a>, 1st round (1st pick, 1st overall), <a href="/draft/NBA_2012.html">2012 NBA Draft</a>
    </p>
    <p><strong>NBA Debut: </strong><a href="/boxscores/201210310NOH.html">October 31, 2012</a></p>
    <p><strong>Experience:</strong> 12 years</p>
  </div>
</div>
</body></html>
"#;

    #[test]
    fn test_parse_profile() {
        let profile = parse_profile(PLAYER_PAGE).unwrap();

        assert_eq!(profile.full_name.as_deref(), Some("Anthony Davis"));
        assert_eq!(profile.instagram.as_deref(), Some("antdavis23"));
        assert_eq!(profile.team.as_deref(), Some("Dallas Mavericks"));
        assert_eq!(profile.recruiting_rank_year.as_deref(), Some("2011"));
        assert_eq!(profile.recruiting_rank.as_deref(), Some("1"));
        assert_eq!(profile.nicknames, vec!["The Brow", "Unibrow"]);
        assert_eq!(profile.position.as_deref(), Some("Power Forward and Center"));
        assert_eq!(profile.shoots.as_deref(), Some("Right"));
        assert_eq!(profile.height_ft_in.as_deref(), Some("6-10"));
        assert_eq!(profile.weight_lb.as_deref(), Some("253"));
        assert_eq!(profile.height_cm.as_deref(), Some("208"));
        assert_eq!(profile.weight_kg.as_deref(), Some("114"));
        assert_eq!(profile.birth_date.as_deref(), Some("March 11, 1993"));
        assert_eq!(profile.birth_place.as_deref(), Some("Chicago"));
        assert_eq!(profile.college.as_deref(), Some("Kentucky"));
        assert_eq!(profile.high_school.as_deref(), Some("Perspectives Charter"));
        assert_eq!(
            profile.high_school_location.as_deref(),
            Some("Chicago, Illinois")
        );
        assert_eq!(profile.draft_team.as_deref(), Some("New Orleans Hornets"));
        assert_eq!(profile.draft_round.as_deref(), Some("1"));
        assert_eq!(profile.draft_pick.as_deref(), Some("1"));
        assert_eq!(profile.draft_overall.as_deref(), Some("1"));
        assert_eq!(profile.draft_year.as_deref(), Some("2012"));
        assert_eq!(profile.nba_debut.as_deref(), Some("October 31, 2012"));
        assert_eq!(profile.experience.as_deref(), Some("12"));
    }

    #[test]
    fn test_position_and_shooting_hand() {
        let html = r#"<div id="meta"><p><strong>Position:</strong> Center • <strong>Shoots:</strong> Right</p></div>"#;
        let profile = parse_profile(html).unwrap();
        // "Shoots:" shares the paragraph, so the position is cut at the bullet
        assert_eq!(profile.position.as_deref(), Some("Center"));
        assert_eq!(profile.shoots.as_deref(), Some("Right"));
    }

    #[test]
    fn test_page_without_meta_is_empty() {
        let profile = parse_profile("<html><body><p>nothing</p></body></html>").unwrap();
        assert_eq!(profile, PlayerProfile::default());
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_profile() {
        let scraper = PlayerProfileScraper::new();
        let profile = scraper
            .fetch_profile("https://www.basketball-reference.com/players/d/davisan02.html")
            .await
            .unwrap();
        assert!(profile.full_name.is_some());
    }
}
