//! LaTeX source of the order document.

use std::fmt::Write;

use super::common::{escape_latex, format_size};
use crate::catalog::SupplierInfo;
use crate::order::OrderArticle;

const PREAMBLE: &str = r"\documentclass[a4paper,oneside,11pt]{article}
\usepackage[
    top=15mm,
    left=20mm,
    right=20mm,
    bottom=20mm,
]{geometry}
\usepackage[ngerman]{babel}
\usepackage[default]{opensans}
\usepackage{longtable}
\setlength{\parskip}{1em}
\setlength{\parindent}{0em}
\begin{document}
";

const TABLE_HEAD: &str = r"\begin{center}
    \begin{longtable}{c l c c}
        \hline
        \textbf{Artikel-Nr.} & \textbf{Artikel} & \textbf{Gebinde} & \textbf{Menge} \\
        \hline
    \endhead
";

const TABLE_FOOT: &str = r"        \hline
    \end{longtable}
\end{center}

";

/// Build configuration placed next to the document: PDF via xelatex, and
/// always rebuild.
pub const LATEXMKRC: &str = "$pdf_mode = 5;\n$go_mode = 1;\n";

/// Render the order document for one supplier.
pub fn render_order_tex(articles: &[OrderArticle], date: &str, info: &SupplierInfo) -> String {
    let mut tex = String::from(PREAMBLE);

    // Writing into a String cannot fail.
    let _ = write!(
        tex,
        "\\textbf{{{name}}}\n\
         \n\
         \\parbox[t]{{.5\\linewidth}}{{{address}}}%\n\
         \\parbox[t]{{.5\\linewidth}}{{\\raggedleft Lieferdatum: {date}}}\n\
         \n\
         St.-Nr.: {tax_id}\\\\\n\
         Kd.-Nr.: {customer_id}\n\
         \n\
         {from_name}: {from_phone}\n\
         \n",
        name = escape_latex(&info.name),
        address = escape_latex(&info.from_address),
        date = escape_latex(date),
        tax_id = escape_latex(&info.tax_id),
        customer_id = escape_latex(&info.customer_id.to_string()),
        from_name = escape_latex(&info.from_name),
        from_phone = escape_latex(&info.from_phone),
    );

    tex.push_str(TABLE_HEAD);
    for article in articles {
        let _ = writeln!(
            tex,
            "        {} & {} & {} & {} \\\\",
            escape_latex(article.id.as_deref().unwrap_or("")),
            escape_latex(&article.name),
            escape_latex(&format_size(article.size.as_deref())),
            escape_latex(&article.amount),
        );
    }
    tex.push_str(TABLE_FOOT);

    let _ = write!(
        tex,
        "Mit freundlichen Grüßen\\\\\n{}\n\\end{{document}}\n",
        escape_latex(&info.from_name)
    );

    tex
}
