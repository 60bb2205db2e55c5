use super::http::trigger_reminder_check;
use crate::modules::system::http::print_json_response;
use crate::modules::system::CommandContext;

pub(crate) async fn handle_remind(ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let response = trigger_reminder_check(ctx).await?;
    print_json_response(response).await
}
