use crate::domain::entities::{Camera, Command, CommandRegistry, Content, Message, Reply, Rover};
use crate::domain::traits::PhotoSource;
use crate::application::errors::CommandError;
use crate::application::views::{notices, DetailPanel, ImageCard};
use super::photo_service::{CommandOutcome, PhotoRequest, PhotoService};

pub const PHOTO_COMMAND: &str = "mars";

/// What a command produced
#[derive(Debug, Clone)]
pub enum Response {
    Reply(Reply),
    /// A photo card whose details still need a session
    Photo { card: ImageCard, details: DetailPanel },
}

/// Service for managing and executing commands
pub struct CommandService<S: PhotoSource> {
    registry: CommandRegistry,
    prefix: String,
    photos: PhotoService<S>,
    combinations_image: String,
}

impl<S: PhotoSource> CommandService<S> {
    pub fn new(prefix: impl Into<String>, photos: PhotoService<S>, combinations_image: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
            photos,
            combinations_image: combinations_image.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        self.register(Command::new("start")
            .with_description("Start the bot"));

        self.register(Command::new("help")
            .with_description("Show help message")
            .with_usage("/help [command]"));

        self.register(Command::new("version")
            .with_description("Show bot version"));

        self.register(Command::new(PHOTO_COMMAND)
            .with_description("Get a random photo from Mars!")
            .with_aliases(vec!["nasa".to_string()])
            .with_usage("/mars <rover> <camera> <sol>"));
    }

    pub fn photos(&self) -> &PhotoService<S> {
        &self.photos
    }

    pub async fn handle(&self, message: &Message) -> Result<Option<Response>, CommandError> {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        // Find command (without prefix)
        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        let response = match cmd.name.as_str() {
            "start" => Response::Reply(Reply::text(format!(
                "🚀 Welcome! I fetch random photos taken by the Mars rovers.\n\n{}",
                self.get_help(None)
            ))),
            "help" => Response::Reply(Reply::text(self.get_help(args.first().map(|s| s.as_str())))),
            "version" => Response::Reply(Reply::text(format!("mars-bot v{}", env!("CARGO_PKG_VERSION")))),
            PHOTO_COMMAND => match parse_photo_args(args) {
                Ok(request) => self.photo(request).await,
                Err(problem) => Response::Reply(notices::usage(PHOTO_COMMAND, &problem)),
            },
            other => return Err(CommandError::NotFound(other.to_string())),
        };
        Ok(Some(response))
    }

    async fn photo(&self, request: PhotoRequest) -> Response {
        match self.photos.run(request).await {
            CommandOutcome::Found(record) => Response::Photo {
                card: ImageCard::from_record(&record),
                details: DetailPanel::from_record(&record),
            },
            CommandOutcome::RateLimited => Response::Reply(notices::rate_limited()),
            CommandOutcome::Invalid(e) => Response::Reply(notices::invalid(&e, &self.combinations_image)),
            CommandOutcome::NoResults(request) => Response::Reply(notices::no_results(&request)),
            CommandOutcome::Failed(e) => Response::Reply(notices::fetch_failed(&e)),
        }
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            let name = name.trim_start_matches('/');
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("/{} - {}", cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}", usage));
                }
                return help;
            }
            return format!("Command /{} not found", name);
        }

        // List all commands
        let mut help = "Available commands:\n".to_string();
        for cmd in self.registry.all() {
            help.push_str(&format!("  /{} - {}\n", cmd.name, cmd.description.as_deref().unwrap_or("")));
        }
        help
    }

    /// Registered commands in name order
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.registry.all()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// `<rover> <camera> <sol>`, case-insensitive
fn parse_photo_args(args: &[String]) -> Result<PhotoRequest, String> {
    let [rover, camera, sol] = args else {
        return Err("Expected a rover, a camera and a sol.".to_string());
    };

    let rover = rover.parse::<Rover>().map_err(|_| format!("Unknown rover `{}`.", rover))?;
    let camera = camera.parse::<Camera>().map_err(|_| format!("Unknown camera `{}`.", camera))?;
    let sol = sol.parse::<i64>().map_err(|_| format!("Sol must be a whole number, got `{}`.", sol))?;

    Ok(PhotoRequest { rover, camera, sol })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::application::errors::PhotoError;
    use crate::domain::entities::{PhotoRecord, ReplyBody};

    struct FixedSource(Vec<PhotoRecord>);

    #[async_trait]
    impl PhotoSource for FixedSource {
        async fn max_sol(&self, _rover: Rover) -> Result<Option<u32>, PhotoError> {
            Ok(None)
        }

        async fn photos(&self, _rover: Rover, _camera: Camera, _sol: u32) -> Result<Vec<PhotoRecord>, PhotoError> {
            Ok(self.0.clone())
        }
    }

    fn commands(photos: Vec<PhotoRecord>) -> CommandService<FixedSource> {
        let service = PhotoService::with_rng(FixedSource(photos), Duration::from_secs(180), StdRng::seed_from_u64(3));
        let mut commands = CommandService::new("/", service, "https://example.com/cams.png");
        commands.register_defaults();
        commands
    }

    fn reply_of(response: Option<Response>) -> Reply {
        match response {
            Some(Response::Reply(reply)) => reply,
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_photo_args() {
        let args = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();

        assert_eq!(
            parse_photo_args(&args("curiosity navcam 1000")),
            Ok(PhotoRequest { rover: Rover::Curiosity, camera: Camera::Navcam, sol: 1000 })
        );
        assert_eq!(parse_photo_args(&args("Spirit PANCAM -4")).map(|r| r.sol), Ok(-4));
        assert!(parse_photo_args(&args("spirit pancam")).is_err());
        assert!(parse_photo_args(&args("zhurong navcam 1")).unwrap_err().contains("zhurong"));
        assert!(parse_photo_args(&args("spirit navcam one")).unwrap_err().contains("one"));
    }

    #[tokio::test]
    async fn test_photo_command_returns_card() {
        let record = PhotoRecord {
            img_src: Some("https://mars.example/a.jpg".to_string()),
            status: Some("complete".to_string()),
            ..Default::default()
        };
        let commands = commands(vec![record]);
        let msg = Message::from_command("1", "nasa", vec!["Spirit".into(), "NAVCAM".into(), "10".into()]);

        match commands.handle(&msg).await {
            Ok(Some(Response::Photo { card, details })) => {
                assert_eq!(card.image_url.as_deref(), Some("https://mars.example/a.jpg"));
                assert_eq!(details.get("Status"), Some("Complete"));
            }
            other => panic!("expected a photo, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bad_arguments_reply_with_usage() {
        let commands = commands(vec![]);
        let msg = Message::from_command("1", "mars", vec!["Curiosity".into()]);
        let reply = reply_of(commands.handle(&msg).await.expect("handled"));

        assert!(reply.is_ephemeral());
        assert!(reply.text_content().contains("Usage: /mars <rover> <camera> <sol>"));
    }

    #[tokio::test]
    async fn test_invalid_combination_shows_chart() {
        let commands = commands(vec![]);
        let msg = Message::from_command("1", "mars", vec!["Curiosity".into(), "PANCAM".into(), "10".into()]);
        let reply = reply_of(commands.handle(&msg).await.expect("handled"));

        assert!(reply.is_ephemeral());
        assert!(matches!(reply.body, ReplyBody::Photo { .. }));
    }

    #[tokio::test]
    async fn test_no_photos_reply() {
        let commands = commands(vec![]);
        let msg = Message::from_command("1", "mars", vec!["Curiosity".into(), "MAST".into(), "10".into()]);
        let reply = reply_of(commands.handle(&msg).await.expect("handled"));

        assert_eq!(reply.text_content(), "❌ No photos found for `Curiosity` on sol `10` with camera `MAST`!");
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let commands = commands(vec![]);
        let msg = Message::from_command("1", "weather", vec![]);
        assert!(matches!(commands.handle(&msg).await, Err(CommandError::NotFound(name)) if name == "weather"));
    }

    #[test]
    fn test_help_lists_commands() {
        let commands = commands(vec![]);
        let help = commands.get_help(None);
        for name in ["/help", "/mars", "/start", "/version"] {
            assert!(help.contains(name), "{} missing from help", name);
        }
        assert!(commands.get_help(Some("nasa")).contains("Usage: /mars <rover> <camera> <sol>"));
        assert_eq!(commands.get_help(Some("weather")), "Command /weather not found");
    }
}
