/// Plain prose paragraph, roughly one SVG caption long.
pub const PROSE: &str = "The quick brown fox jumps over the lazy dog while the \
well-known river keeps flowing past the old mill and the bridge\u{2014}worn by \
years of weather\u{2014}still carries travellers to the market on the far side.";

/// The same paragraph with nested inline markup and forced breaks.
pub const MARKED_UP: &str = "The <tspan font-weight=\"bold\">quick brown \
<a href=\"#fox\">fox jumps</a> over</tspan> the lazy dog<br>while the \
<tspan fill='red'>well-known river keeps</tspan> flowing past the old mill\n\
and the <tspan>bridge\u{2014}worn by years of weather\u{2014}still</tspan> \
carries travellers to the market on the far side.";

/// A paragraph repeated `times` times, separated by spaces.
pub fn repeated(paragraph: &str, times: usize) -> String {
    let mut out = String::with_capacity((paragraph.len() + 1) * times);
    for i in 0..times {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(paragraph);
    }
    out
}
