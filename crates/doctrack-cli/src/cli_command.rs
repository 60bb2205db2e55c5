use crate::cli_args::*;
use crate::modules::system::CommandContext;

use crate::modules::auth::handle_token;
use crate::modules::documents::handle_docs;
use crate::modules::reminders::handle_remind;
use crate::modules::smoke::handle_smoke;
use crate::modules::system::handle_health;

pub(crate) async fn handle_command(
    command: Command,
    ctx: &mut CommandContext<'_>,
) -> anyhow::Result<()> {
    match command {
        Command::Health => handle_health(ctx).await?,
        Command::Token(args) => handle_token(args, ctx).await?,
        Command::Docs(args) => handle_docs(args, ctx).await?,
        Command::Remind => handle_remind(ctx).await?,
        Command::Smoke(args) => handle_smoke(args, ctx).await?,
    }

    Ok(())
}
