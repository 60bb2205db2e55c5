use clap::{Args, Subcommand};
use doctrack_core::{roles, NewUser};
use doctrack_db::repo::{is_unique_violation, UserRepo};
use doctrack_db::PgPool;

#[derive(Debug, Clone, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum UserCommand {
    /// Create a user that can receive reminders
    Create(UserCreateArgs),
    /// List all users
    List,
}

#[derive(Debug, Clone, Args)]
pub struct UserCreateArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = roles::USER)]
    pub role: String,
}

pub async fn run(db: &PgPool, args: &UserArgs) -> Result<(), String> {
    match &args.command {
        UserCommand::Create(create) => create_user(db, create).await,
        UserCommand::List => list_users(db).await,
    }
}

async fn create_user(db: &PgPool, args: &UserCreateArgs) -> Result<(), String> {
    let user = NewUser {
        username: args.username.trim().to_string(),
        email: args.email.trim().to_string(),
        role: args.role.trim().to_string(),
    };
    user.validate().map_err(|err| format!("invalid user: {err}"))?;
    let created = UserRepo::new(db).create(&user).await.map_err(|err| {
        if is_unique_violation(&err) {
            "username or email already exists".to_string()
        } else {
            format!("user create failed: {err}")
        }
    })?;
    tracing::info!(event = "user_created", user_id = created.id, role = %created.role);
    let json = serde_json::to_string_pretty(&created)
        .map_err(|err| format!("output encode failed: {err}"))?;
    println!("{json}");
    Ok(())
}

async fn list_users(db: &PgPool) -> Result<(), String> {
    let users = UserRepo::new(db)
        .list()
        .await
        .map_err(|err| format!("user list failed: {err}"))?;
    for user in users {
        println!(
            "{}\t{}\t{}\t{}",
            user.id, user.username, user.email, user.role
        );
    }
    Ok(())
}
