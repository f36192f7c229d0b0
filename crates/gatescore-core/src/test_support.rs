//! Builders for synthetic response-sheet markup used by unit tests.

use crate::layout::ExamLayout;

fn image_name(qnum: u32, suffix: &str) -> String {
    if qnum <= 10 {
        format!("G113X88_GA_gaq{qnum}{suffix}.png")
    } else {
        format!("G113X88_DA_daq{qnum}{suffix}.png")
    }
}

fn open_block(qnum: u32) -> String {
    let name = image_name(qnum, "q");
    format!(
        r#"<div class="question-pnl" id="q{qnum}"><table><tbody><tr><td>Q.{qnum}</td><td><img name="{name}" src="/img/{name}" /></td></tr>"#
    )
}

fn menu_row(label: &str, value: &str) -> String {
    format!(r#"<tr><td align="right">{label} :</td><td class="bold">{value}</td></tr>"#)
}

/// An MCQ/MSQ block. `canonical[i]` is the canonical letter shown under
/// displayed label `A + i`; an empty slice renders unrecognizable option images.
pub(crate) fn choice_block(
    qnum: u32,
    qtype: &str,
    status: &str,
    chosen: &str,
    canonical: &[char],
) -> String {
    let mut block = open_block(qnum);
    for (i, displayed) in ['A', 'B', 'C', 'D'].iter().enumerate() {
        let name = match canonical.get(i) {
            Some(letter) => image_name(qnum, &letter.to_ascii_lowercase().to_string()),
            None => format!("G113X88_option{}.png", i + 1),
        };
        block.push_str(&format!(
            r#"<tr><td valign="top">{displayed}. <img name="{name}" src="/img/{name}" /></td></tr>"#
        ));
    }
    block.push_str("</tbody></table><table><tbody>");
    block.push_str(&menu_row("Question Type", qtype));
    block.push_str(&menu_row("Status", status));
    block.push_str(&menu_row("Chosen Option", chosen));
    block.push_str("</tbody></table></div>");
    block
}

/// A NAT block with the given answer text.
pub(crate) fn nat_block(qnum: u32, status: &str, given: &str) -> String {
    let mut block = open_block(qnum);
    block.push_str("</tbody></table><table><tbody>");
    block.push_str(&menu_row("Question Type", "NAT"));
    block.push_str(&menu_row("Status", status));
    block.push_str(&menu_row("Given Answer", given));
    block.push_str("</tbody></table></div>");
    block
}

/// A whole minified sheet; `block_for` returns `None` to leave a question out.
pub(crate) fn response_sheet(block_for: impl Fn(u32) -> Option<String>) -> String {
    let mut html = String::from("<html><body><table><tr><td>Candidate ID</td><td>T001</td></tr></table>");
    for qnum in ExamLayout::default().questions() {
        if let Some(block) = block_for(qnum) {
            html.push_str(&block);
        }
    }
    html.push_str("</body></html>");
    html
}
