use doctrack_core::Document;
use html_escape::encode_safe;
use std::fmt::Write;

pub const REMINDER_SUBJECT: &str = "Document Expiry Reminder";

/// HTML digest of the documents expiring within `window_days`.
pub fn render_reminder_html(documents: &[Document], window_days: i64) -> String {
    let mut body = String::new();
    body.push_str("<html>\n<body>\n");
    body.push_str("<h2>Document Expiry Reminder</h2>\n");
    let _ = writeln!(
        body,
        "<p>The following documents are expiring within {window_days} days:</p>"
    );
    body.push_str("<table border=\"1\" style=\"border-collapse: collapse;\">\n");
    body.push_str(
        "<tr><th>Document Type</th><th>Owner</th><th>Document Number</th>\
         <th>Expiry Date</th><th>Action Due Date</th></tr>\n",
    );
    for doc in documents {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            encode_safe(&doc.document_type),
            encode_safe(&doc.document_owner),
            encode_safe(&doc.document_number),
            doc.expiry_date,
            doc.action_due_date,
        );
    }
    body.push_str("</table>\n");
    body.push_str("<p>Please take necessary action before the expiry dates.</p>\n");
    body.push_str("</body>\n</html>\n");
    body
}
