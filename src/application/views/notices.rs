//! Ephemeral replies for every photo command that does not end in a photo

use crate::application::errors::{PhotoError, ValidationError};
use crate::application::services::photo_service::PhotoRequest;
use crate::domain::entities::{Camera, Reply, Rover};

const RETRY_LATER: &str = "> Please try again later...";

pub const PANEL_EXPIRED: &str = "This panel has expired.";

fn failure_text(reason: &str) -> String {
    format!("❌ {}\n{}", reason, RETRY_LATER)
}

pub fn rate_limited() -> Reply {
    Reply::text(failure_text("We are being rate limited!")).ephemeral()
}

/// Upstream failure, mapped by kind
pub fn fetch_failed(error: &PhotoError) -> Reply {
    let reason = match error {
        PhotoError::RateLimited => "We are being rate limited!".to_string(),
        PhotoError::Api { status } => format!("API returned status code `{}`", status),
        PhotoError::Network(_) | PhotoError::Parse(_) => "Something went wrong...".to_string(),
    };
    Reply::text(failure_text(&reason)).ephemeral()
}

pub fn invalid(error: &ValidationError, combinations_image: &str) -> Reply {
    match error {
        ValidationError::InvalidCombination { .. } => {
            let text = "❌ Please check out the possible rover and camera combinations!";
            let reply = if combinations_image.is_empty() {
                Reply::text(format!("{}\n{}", text, combinations_text()))
            } else {
                Reply::photo(combinations_image, text)
            };
            reply.ephemeral()
        }
        ValidationError::SolOutOfRange { rover, max, .. } => Reply::text(format!(
            "❌ Please enter a valid sol number for `{}`! (0-{})",
            rover, max
        ))
        .ephemeral(),
    }
}

pub fn no_results(request: &PhotoRequest) -> Reply {
    Reply::text(format!(
        "❌ No photos found for `{}` on sol `{}` with camera `{}`!",
        request.rover, request.sol, request.camera
    ))
    .ephemeral()
}

/// Argument help for the photo command
pub fn usage(command: &str, problem: &str) -> Reply {
    let rovers: Vec<&str> = Rover::ALL.iter().map(|r| r.as_str()).collect();
    let cameras: Vec<&str> = Camera::ALL.iter().map(|c| c.as_str()).collect();
    Reply::text(format!(
        "❌ {}\nUsage: /{} <rover> <camera> <sol>\nRovers: {}\nCameras: {}",
        problem,
        command,
        rovers.join(", "),
        cameras.join(", ")
    ))
    .ephemeral()
}

/// Plain-text version of the combinations chart
fn combinations_text() -> String {
    Rover::ALL
        .iter()
        .map(|rover| {
            let cameras: Vec<&str> = rover.cameras().iter().map(|c| c.as_str()).collect();
            format!("{}: {}", rover, cameras.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ReplyBody;

    #[test]
    fn test_sol_message_shows_range() {
        let reply = invalid(
            &ValidationError::SolOutOfRange { rover: Rover::Spirit, sol: 9000, max: 2208 },
            "https://example.com/cams.png",
        );
        assert!(reply.is_ephemeral());
        assert_eq!(reply.text_content(), "❌ Please enter a valid sol number for `Spirit`! (0-2208)");
    }

    #[test]
    fn test_combination_message_attaches_chart() {
        let error = ValidationError::InvalidCombination { rover: Rover::Curiosity, camera: Camera::Pancam };

        let reply = invalid(&error, "https://example.com/cams.png");
        assert!(matches!(reply.body, ReplyBody::Photo { ref url, .. } if url == "https://example.com/cams.png"));

        let reply = invalid(&error, "");
        assert!(reply.text_content().contains("Curiosity: FHAZ, RHAZ, MAST, CHEMCAM, MAHLI, MARDI, NAVCAM"));
        assert!(reply.text_content().contains("Spirit: FHAZ, RHAZ, NAVCAM, PANCAM, MINITES"));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            fetch_failed(&PhotoError::RateLimited).text_content(),
            "❌ We are being rate limited!\n> Please try again later..."
        );
        assert_eq!(
            fetch_failed(&PhotoError::Api { status: 500 }).text_content(),
            "❌ API returned status code `500`\n> Please try again later..."
        );
        assert_eq!(
            fetch_failed(&PhotoError::Network("timeout".to_string())).text_content(),
            "❌ Something went wrong...\n> Please try again later..."
        );
        assert_eq!(rate_limited().text_content(), fetch_failed(&PhotoError::RateLimited).text_content());
    }

    #[test]
    fn test_no_results_message() {
        let reply = no_results(&PhotoRequest { rover: Rover::Opportunity, camera: Camera::Pancam, sol: 12 });
        assert!(reply.is_ephemeral());
        assert_eq!(reply.text_content(), "❌ No photos found for `Opportunity` on sol `12` with camera `PANCAM`!");
    }
}
