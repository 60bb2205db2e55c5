use doctrack_core::api::documents::ExpiringDocumentsResponse;
use doctrack_core::{Document, DocumentPatch, NewDocument};

use super::http::{
    create_document, delete_document, expiring_documents, get_document, list_documents,
    update_document,
};
use crate::cli_args::*;
use crate::modules::documents::print_documents_table;
use crate::modules::system::http::{print_json_response, read_json};
use crate::modules::system::CommandContext;

pub(crate) async fn handle_docs(args: DocsArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    match args.command {
        DocsCommand::List(args) => {
            let response = list_documents(ctx, args.skip, args.limit).await?;
            if args.table {
                let documents: Vec<Document> = read_json(response).await?;
                print_documents_table(&documents);
            } else {
                print_json_response(response).await?;
            }
        }
        DocsCommand::Get(args) => {
            let response = get_document(ctx, args.sno).await?;
            print_json_response(response).await?;
        }
        DocsCommand::Create(args) => {
            let payload = NewDocument {
                document_type: args.document_type,
                document_owner: args.owner,
                document_number: args.number,
                expiry_date: args.expiry,
                action_due_date: args.due,
            };
            let response = create_document(ctx, &payload).await?;
            print_json_response(response).await?;
        }
        DocsCommand::Update(args) => {
            let sno = args.sno;
            let payload = build_patch(args);
            if payload.is_empty() {
                anyhow::bail!("nothing to update; pass at least one of --type, --owner, --number, --expiry, --due");
            }
            let response = update_document(ctx, sno, &payload).await?;
            print_json_response(response).await?;
        }
        DocsCommand::Delete(args) => {
            let response = delete_document(ctx, args.sno).await?;
            print_json_response(response).await?;
        }
        DocsCommand::Expiring(args) => {
            let response = expiring_documents(ctx, args.days).await?;
            if args.table {
                let expiring: ExpiringDocumentsResponse = read_json(response).await?;
                println!(
                    "{} document(s) expiring within {} days",
                    expiring.count, expiring.days_ahead
                );
                print_documents_table(&expiring.expiring_documents);
            } else {
                print_json_response(response).await?;
            }
        }
    }
    Ok(())
}

pub(crate) fn build_patch(args: DocsUpdateArgs) -> DocumentPatch {
    DocumentPatch {
        document_type: args.document_type,
        document_owner: args.owner,
        document_number: args.number,
        expiry_date: args.expiry,
        action_due_date: args.due,
    }
}
