//! Image card and detail panel for a rover photo

use chrono::NaiveDate;
use crate::domain::entities::{PhotoRecord, Reply};
use crate::domain::traits::KeyboardButton;

/// Marker for values the API left out
pub const NOT_APPLICABLE: &str = "`N/A`";

pub const CARD_CAPTION: &str = "Here's a random photo from Mars!";
pub const MORE_INFO_LABEL: &str = "More info";

/// Callback data prefix of the "More info" button
pub const INFO_CALLBACK_PREFIX: &str = "info:";

/// Image-forward summary of a photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCard {
    pub image_url: Option<String>,
    pub caption: String,
}

impl ImageCard {
    pub fn from_record(record: &PhotoRecord) -> Self {
        Self {
            image_url: record.img_src.clone().filter(|url| !url.is_empty()),
            caption: CARD_CAPTION.to_string(),
        }
    }

    /// Public reply carrying a "More info" button bound to `token`
    pub fn into_reply(self, token: &str) -> Reply {
        let button = KeyboardButton::new(MORE_INFO_LABEL)
            .with_callback(format!("{}{}", INFO_CALLBACK_PREFIX, token));

        let reply = match self.image_url {
            Some(url) => Reply::photo(url, self.caption),
            None => Reply::text(self.caption),
        };
        reply.with_buttons(vec![button])
    }
}

/// One labelled value in the detail panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub name: String,
    pub value: String,
}

/// Metadata listing shown behind the "More info" button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub fields: Vec<DetailField>,
}

impl DetailPanel {
    pub fn from_record(record: &PhotoRecord) -> Self {
        let fields = record
            .details()
            .into_iter()
            .map(|(key, value)| DetailField {
                name: field_name(key),
                value: field_value(key, value),
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn render(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("*{}*: {}", f.name, f.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// "photo_earth_date" -> "Photo Earth Date"
fn field_name(key: &str) -> String {
    title_case(&key.replace('_', " "))
}

fn field_value(key: &str, value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return NOT_APPLICABLE.to_string();
    };

    if key.ends_with("_date") {
        format_date(value)
    } else if key == "status" {
        title_case(value)
    } else {
        value.to_string()
    }
}

/// Render an API date (`%Y-%m-%d`) as a long date; anything else is shown as is
pub fn format_date(value: &str) -> String {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

/// Uppercase the first letter of every word, lowercase the rest
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ReplyBody;

    fn record() -> PhotoRecord {
        PhotoRecord {
            img_src: Some("https://mars.nasa.gov/msl-raw-images/1.JPG".to_string()),
            rover: Some("Curiosity".to_string()),
            landing_date: Some("2012-08-06".to_string()),
            launch_date: Some("2011-11-26".to_string()),
            camera: Some("NAVCAM".to_string()),
            photo_earth_date: Some("2023-05-01".to_string()),
            status: Some("active".to_string()),
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2023-05-01"), "May 1, 2023");
        assert_eq!(format_date("2023-05-01"), format_date("2023-05-01"));
        assert_eq!(format_date("2004-01-25"), "January 25, 2004");
        assert_eq!(format_date("sometime"), "sometime");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("active"), "Active");
        assert_eq!(title_case("COMPLETE"), "Complete");
        assert_eq!(title_case("landing date"), "Landing Date");
    }

    #[test]
    fn test_detail_panel_fields() {
        let panel = DetailPanel::from_record(&record());
        let names: Vec<&str> = panel.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Rover", "Landing Date", "Launch Date", "Camera", "Photo Earth Date", "Status"]);

        assert_eq!(panel.get("Rover"), Some("Curiosity"));
        assert_eq!(panel.get("Landing Date"), Some("August 6, 2012"));
        assert_eq!(panel.get("Photo Earth Date"), Some("May 1, 2023"));
        assert_eq!(panel.get("Status"), Some("Active"));
        assert!(panel.get("Img Src").is_none());
    }

    #[test]
    fn test_missing_values_are_marked() {
        let panel = DetailPanel::from_record(&PhotoRecord {
            rover: Some("Spirit".to_string()),
            status: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(panel.get("Rover"), Some("Spirit"));
        for name in ["Landing Date", "Launch Date", "Camera", "Photo Earth Date", "Status"] {
            assert_eq!(panel.get(name), Some(NOT_APPLICABLE), "{}", name);
        }
        assert!(panel.fields.iter().all(|f| !f.value.is_empty()));
    }

    #[test]
    fn test_render_lists_every_field() {
        let text = DetailPanel::from_record(&record()).render();
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("*Rover*: Curiosity"));
        assert!(text.ends_with("*Status*: Active"));
    }

    #[test]
    fn test_card_reply_has_info_button() {
        let reply = ImageCard::from_record(&record()).into_reply("abc");
        assert!(!reply.is_ephemeral());
        assert_eq!(reply.buttons[0][0].callback_data.as_deref(), Some("info:abc"));
        assert_eq!(reply.buttons[0][0].text, MORE_INFO_LABEL);
        match reply.body {
            ReplyBody::Photo { url, caption } => {
                assert_eq!(url, "https://mars.nasa.gov/msl-raw-images/1.JPG");
                assert_eq!(caption, CARD_CAPTION);
            }
            other => panic!("expected photo reply, got {:?}", other),
        }
    }

    #[test]
    fn test_card_without_image_falls_back_to_text() {
        let record = PhotoRecord { img_src: None, ..record() };
        let reply = ImageCard::from_record(&record).into_reply("xyz");
        assert!(matches!(reply.body, ReplyBody::Text(ref t) if t == CARD_CAPTION));
        assert_eq!(reply.buttons.len(), 1);
    }
}
