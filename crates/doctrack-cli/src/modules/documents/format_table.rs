use doctrack_core::Document;

const HEADERS: [&str; 6] = ["SNO", "TYPE", "OWNER", "NUMBER", "EXPIRY", "DUE"];

pub(crate) fn format_documents_table(documents: &[Document]) -> String {
    let rows: Vec<[String; 6]> = documents
        .iter()
        .map(|doc| {
            [
                doc.sno.to_string(),
                doc.document_type.clone(),
                doc.document_owner.clone(),
                doc.document_number.clone(),
                doc.expiry_date.to_string(),
                doc.action_due_date.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, HEADERS.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize; 6]) {
    let line = cells
        .zip(widths.iter())
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub(crate) fn print_documents_table(documents: &[Document]) {
    print!("{}", format_documents_table(documents));
}
