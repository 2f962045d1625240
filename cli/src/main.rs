use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use yoga_studio::config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
use yoga_studio::forms::{LoginField, LoginForm, RegisterField, RegisterForm, SessionField, SessionForm, ValidationError};
use yoga_studio::net::types::{SessionId, SessionInformation, TeacherId, UserId};
use yoga_studio::net::{
    ApiClient, ApiError, AuthApi, AuthError, Gateways, RegistrationError, SessionApi, TeacherApi, UserApi,
};
use yoga_studio::SessionStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing token; pass --token or set YOGA_TOKEN")]
    MissingToken,
    #[error("missing user id; pass --user-id or set YOGA_USER_ID")]
    MissingUserId,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Registration(#[from] RegistrationError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "yoga-cli", about = "Yoga studio booking API CLI")]
struct Cli {
    #[arg(long, env = "YOGA_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token from a previous `login`.
    #[arg(long, env = "YOGA_TOKEN")]
    token: Option<String>,

    /// Id of the user the token belongs to.
    #[arg(long, env = "YOGA_USER_ID")]
    user_id: Option<UserId>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        password: String,
    },
    Session(SessionCommand),
    Teacher(TeacherCommand),
    User(UserCommand),
}

#[derive(Args, Debug)]
struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Args, Debug)]
struct SessionFields {
    #[arg(long)]
    name: String,
    /// Day of the class, `YYYY-MM-DD`.
    #[arg(long)]
    date: String,
    #[arg(long)]
    teacher_id: TeacherId,
    #[arg(long)]
    description: String,
}

#[derive(Subcommand, Debug)]
enum SessionSubcommand {
    List,
    Show { id: SessionId },
    Create(SessionFields),
    Update {
        id: SessionId,
        #[command(flatten)]
        fields: SessionFields,
    },
    Delete { id: SessionId },
    Participate { id: SessionId },
    Unparticipate { id: SessionId },
}

#[derive(Args, Debug)]
struct TeacherCommand {
    #[command(subcommand)]
    command: TeacherSubcommand,
}

#[derive(Subcommand, Debug)]
enum TeacherSubcommand {
    List,
    Show { id: TeacherId },
}

#[derive(Args, Debug)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
enum UserSubcommand {
    /// Defaults to the token's own user.
    Show { id: Option<UserId> },
    Delete { id: Option<UserId> },
}

struct CliContext {
    store: SessionStore,
    api: Gateways,
    user_id: Option<UserId>,
}

impl CliContext {
    fn require_token(&self) -> Result<(), CliError> {
        if self.store.is_logged() { Ok(()) } else { Err(CliError::MissingToken) }
    }

    fn require_user(&self, explicit: Option<UserId>) -> Result<UserId, CliError> {
        explicit.or(self.user_id).ok_or(CliError::MissingUserId)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?.with_base_url(&cli.base_url)?;
    let store = SessionStore::new();
    if let Some(token) = cli.token {
        store.log_in(token_record(token, cli.user_id.unwrap_or_default()));
    }
    let client = ApiClient::new(&config, store.clone())?;
    debug!(base_url = client.base_url(), "client ready");
    let ctx = CliContext { store, api: Gateways::new(&client), user_id: cli.user_id };

    match cli.command {
        Command::Login { email, password } => run_login(&ctx, email, password).await,
        Command::Register { email, first_name, last_name, password } => {
            run_register(&ctx, email, first_name, last_name, password).await
        }
        Command::Session(session) => run_session(&ctx, session).await,
        Command::Teacher(teacher) => run_teacher(&ctx, teacher).await,
        Command::User(user) => run_user(&ctx, user).await,
    }
}

/// Minimal record for a token supplied on the command line. Only the token
/// and user id matter to the gateways.
fn token_record(token: String, user_id: UserId) -> SessionInformation {
    SessionInformation {
        token,
        token_type: "Bearer".to_owned(),
        id: user_id,
        username: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        admin: false,
    }
}

async fn run_login(ctx: &CliContext, email: String, password: String) -> Result<(), CliError> {
    let mut form = LoginForm::new();
    form.set(LoginField::Email, email);
    form.set(LoginField::Password, password);
    let info = ctx.api.auth.login(&form.login_request()?).await?;
    print_json(&info)
}

async fn run_register(
    ctx: &CliContext,
    email: String,
    first_name: String,
    last_name: String,
    password: String,
) -> Result<(), CliError> {
    let mut form = RegisterForm::new();
    form.set(RegisterField::Email, email);
    form.set(RegisterField::FirstName, first_name);
    form.set(RegisterField::LastName, last_name);
    form.set(RegisterField::Password, password);
    ctx.api.auth.register(&form.register_request()?).await?;
    print_json(&json!({ "registered": true }))
}

fn session_form(fields: SessionFields) -> SessionForm {
    let mut form = SessionForm::new();
    form.set(SessionField::Name, fields.name);
    form.set(SessionField::Date, fields.date);
    form.set(SessionField::TeacherId, fields.teacher_id.to_string());
    form.set(SessionField::Description, fields.description);
    form
}

async fn run_session(ctx: &CliContext, session: SessionCommand) -> Result<(), CliError> {
    ctx.require_token()?;
    let api = &ctx.api.sessions;
    match session.command {
        SessionSubcommand::List => print_json(&api.all().await?),
        SessionSubcommand::Show { id } => print_json(&api.detail(id).await?),
        SessionSubcommand::Create(fields) => {
            let payload = session_form(fields).session_payload()?;
            print_json(&api.create(&payload).await?)
        }
        SessionSubcommand::Update { id, fields } => {
            let payload = session_form(fields).session_payload()?;
            print_json(&api.update(id, &payload).await?)
        }
        SessionSubcommand::Delete { id } => {
            api.delete(id).await?;
            print_json(&json!({ "deleted": id }))
        }
        SessionSubcommand::Participate { id } => {
            let user_id = ctx.require_user(None)?;
            api.participate(id, user_id).await?;
            print_json(&api.detail(id).await?)
        }
        SessionSubcommand::Unparticipate { id } => {
            let user_id = ctx.require_user(None)?;
            api.un_participate(id, user_id).await?;
            print_json(&api.detail(id).await?)
        }
    }
}

async fn run_teacher(ctx: &CliContext, teacher: TeacherCommand) -> Result<(), CliError> {
    ctx.require_token()?;
    match teacher.command {
        TeacherSubcommand::List => print_json(&ctx.api.teachers.all().await?),
        TeacherSubcommand::Show { id } => print_json(&ctx.api.teachers.detail(id).await?),
    }
}

async fn run_user(ctx: &CliContext, user: UserCommand) -> Result<(), CliError> {
    ctx.require_token()?;
    match user.command {
        UserSubcommand::Show { id } => {
            let id = ctx.require_user(id)?;
            print_json(&ctx.api.users.get_by_id(id).await?)
        }
        UserSubcommand::Delete { id } => {
            let id = ctx.require_user(id)?;
            ctx.api.users.delete(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
