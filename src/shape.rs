//! Best-effort Arabic shaping for renderers that place glyphs naively
//! left-to-right: contextual joining into Unicode presentation forms,
//! then UAX#9 reordering into visual order. No kerning or stylistic
//! ligatures beyond lam-alef.

use unicode_bidi::BidiInfo;

use crate::script::looks_arabic;

const TATWEEL: char = '\u{0640}';
const LAM: char = '\u{0644}';

/// Contextual presentation forms for one Arabic letter.
///
/// `final_` is `None` for letters that never accept a preceding connection
/// (hamza); `initial`/`medial` are `None` for right-joining letters
/// (alef, dal, reh, waw, ...).
#[derive(Clone, Copy, Debug)]
struct Forms {
    isolated: char,
    final_: Option<char>,
    initial: Option<char>,
    medial: Option<char>,
}

const fn dual(isolated: char, final_: char, initial: char, medial: char) -> Forms {
    Forms {
        isolated,
        final_: Some(final_),
        initial: Some(initial),
        medial: Some(medial),
    }
}

const fn right(isolated: char, final_: char) -> Forms {
    Forms {
        isolated,
        final_: Some(final_),
        initial: None,
        medial: None,
    }
}

fn forms(c: char) -> Option<Forms> {
    let f = match c {
        '\u{0621}' => Forms {
            isolated: '\u{FE80}',
            final_: None,
            initial: None,
            medial: None,
        },
        '\u{0622}' => right('\u{FE81}', '\u{FE82}'),
        '\u{0623}' => right('\u{FE83}', '\u{FE84}'),
        '\u{0624}' => right('\u{FE85}', '\u{FE86}'),
        '\u{0625}' => right('\u{FE87}', '\u{FE88}'),
        '\u{0626}' => dual('\u{FE89}', '\u{FE8A}', '\u{FE8B}', '\u{FE8C}'),
        '\u{0627}' => right('\u{FE8D}', '\u{FE8E}'),
        '\u{0628}' => dual('\u{FE8F}', '\u{FE90}', '\u{FE91}', '\u{FE92}'),
        '\u{0629}' => right('\u{FE93}', '\u{FE94}'),
        '\u{062A}' => dual('\u{FE95}', '\u{FE96}', '\u{FE97}', '\u{FE98}'),
        '\u{062B}' => dual('\u{FE99}', '\u{FE9A}', '\u{FE9B}', '\u{FE9C}'),
        '\u{062C}' => dual('\u{FE9D}', '\u{FE9E}', '\u{FE9F}', '\u{FEA0}'),
        '\u{062D}' => dual('\u{FEA1}', '\u{FEA2}', '\u{FEA3}', '\u{FEA4}'),
        '\u{062E}' => dual('\u{FEA5}', '\u{FEA6}', '\u{FEA7}', '\u{FEA8}'),
        '\u{062F}' => right('\u{FEA9}', '\u{FEAA}'),
        '\u{0630}' => right('\u{FEAB}', '\u{FEAC}'),
        '\u{0631}' => right('\u{FEAD}', '\u{FEAE}'),
        '\u{0632}' => right('\u{FEAF}', '\u{FEB0}'),
        '\u{0633}' => dual('\u{FEB1}', '\u{FEB2}', '\u{FEB3}', '\u{FEB4}'),
        '\u{0634}' => dual('\u{FEB5}', '\u{FEB6}', '\u{FEB7}', '\u{FEB8}'),
        '\u{0635}' => dual('\u{FEB9}', '\u{FEBA}', '\u{FEBB}', '\u{FEBC}'),
        '\u{0636}' => dual('\u{FEBD}', '\u{FEBE}', '\u{FEBF}', '\u{FEC0}'),
        '\u{0637}' => dual('\u{FEC1}', '\u{FEC2}', '\u{FEC3}', '\u{FEC4}'),
        '\u{0638}' => dual('\u{FEC5}', '\u{FEC6}', '\u{FEC7}', '\u{FEC8}'),
        '\u{0639}' => dual('\u{FEC9}', '\u{FECA}', '\u{FECB}', '\u{FECC}'),
        '\u{063A}' => dual('\u{FECD}', '\u{FECE}', '\u{FECF}', '\u{FED0}'),
        TATWEEL => dual(TATWEEL, TATWEEL, TATWEEL, TATWEEL),
        '\u{0641}' => dual('\u{FED1}', '\u{FED2}', '\u{FED3}', '\u{FED4}'),
        '\u{0642}' => dual('\u{FED5}', '\u{FED6}', '\u{FED7}', '\u{FED8}'),
        '\u{0643}' => dual('\u{FED9}', '\u{FEDA}', '\u{FEDB}', '\u{FEDC}'),
        LAM => dual('\u{FEDD}', '\u{FEDE}', '\u{FEDF}', '\u{FEE0}'),
        '\u{0645}' => dual('\u{FEE1}', '\u{FEE2}', '\u{FEE3}', '\u{FEE4}'),
        '\u{0646}' => dual('\u{FEE5}', '\u{FEE6}', '\u{FEE7}', '\u{FEE8}'),
        '\u{0647}' => dual('\u{FEE9}', '\u{FEEA}', '\u{FEEB}', '\u{FEEC}'),
        '\u{0648}' => right('\u{FEED}', '\u{FEEE}'),
        '\u{0649}' => right('\u{FEEF}', '\u{FEF0}'),
        '\u{064A}' => dual('\u{FEF1}', '\u{FEF2}', '\u{FEF3}', '\u{FEF4}'),
        // Persian additions.
        '\u{067E}' => dual('\u{FB56}', '\u{FB57}', '\u{FB58}', '\u{FB59}'),
        '\u{0686}' => dual('\u{FB7A}', '\u{FB7B}', '\u{FB7C}', '\u{FB7D}'),
        '\u{0698}' => right('\u{FB8A}', '\u{FB8B}'),
        '\u{06A9}' => dual('\u{FB8E}', '\u{FB8F}', '\u{FB90}', '\u{FB91}'),
        '\u{06AF}' => dual('\u{FB92}', '\u{FB93}', '\u{FB94}', '\u{FB95}'),
        '\u{06CC}' => dual('\u{FBFC}', '\u{FBFD}', '\u{FBFE}', '\u{FBFF}'),
        _ => return None,
    };
    Some(f)
}

/// Harakat and other combining marks that do not interrupt joining.
fn is_transparent(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Lam + alef-variant ligatures: (isolated, final) presentation forms.
fn lam_alef(alef: char) -> Option<(char, char)> {
    match alef {
        '\u{0622}' => Some(('\u{FEF5}', '\u{FEF6}')),
        '\u{0623}' => Some(('\u{FEF7}', '\u{FEF8}')),
        '\u{0625}' => Some(('\u{FEF9}', '\u{FEFA}')),
        '\u{0627}' => Some(('\u{FEFB}', '\u{FEFC}')),
        _ => None,
    }
}

fn joins_forward(c: char) -> bool {
    forms(c).is_some_and(|f| f.initial.is_some())
}

fn joins_backward(c: char) -> bool {
    forms(c).is_some_and(|f| f.final_.is_some())
}

fn prev_letter(chars: &[char], i: usize) -> Option<char> {
    chars[..i].iter().rev().copied().find(|&c| !is_transparent(c))
}

fn next_letter_idx(chars: &[char], i: usize) -> Option<usize> {
    (i + 1..chars.len()).find(|&j| !is_transparent(chars[j]))
}

/// Replaces Arabic letters with contextual presentation forms, in logical
/// order. Non-Arabic characters and combining marks pass through unchanged.
fn join_presentation_forms(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let Some(f) = forms(c) else {
            out.push(c);
            i += 1;
            continue;
        };

        let connects_prev =
            f.final_.is_some() && prev_letter(&chars, i).is_some_and(joins_forward);

        if c == LAM
            && let Some(j) = next_letter_idx(&chars, i)
            && let Some((iso, fin)) = lam_alef(chars[j])
        {
            out.push(if connects_prev { fin } else { iso });
            // Marks between lam and alef ride along after the ligature.
            for &m in &chars[i + 1..j] {
                out.push(m);
            }
            i = j + 1;
            continue;
        }

        let connects_next = f.initial.is_some()
            && next_letter_idx(&chars, i).is_some_and(|j| joins_backward(chars[j]));

        let shaped = match (connects_prev, connects_next) {
            (true, true) => f.medial.unwrap_or(f.isolated),
            (true, false) => f.final_.unwrap_or(f.isolated),
            (false, true) => f.initial.unwrap_or(f.isolated),
            (false, false) => f.isolated,
        };
        out.push(shaped);
        i += 1;
    }

    out
}

/// Reorders a logical-order string into visual order (UAX#9), so that an
/// RTL run reads correctly when glyphs are placed left-to-right.
fn reorder_visual(text: &str) -> String {
    let bidi = BidiInfo::new(text, None);
    let mut out = String::with_capacity(text.len());
    for para in &bidi.paragraphs {
        out.push_str(&bidi.reorder_line(para, para.range.clone()));
    }
    out
}

/// Produces the visual character sequence for naive left-to-right glyph
/// placement: joined presentation forms, reordered per UAX#9. Text without
/// Arabic characters is returned unchanged.
pub fn shape_visual(text: &str) -> String {
    if !looks_arabic(text) {
        return text.to_string();
    }
    reorder_visual(&join_presentation_forms(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_passes_through() {
        assert_eq!(shape_visual("Hello, world"), "Hello, world");
    }

    #[test]
    fn joined_forms_follow_neighbors() {
        // muhammad: meem-initial, hah-medial, meem-medial, dal-final.
        let joined = join_presentation_forms("محمد");
        let got: Vec<char> = joined.chars().collect();
        assert_eq!(got, vec!['\u{FEE3}', '\u{FEA4}', '\u{FEE4}', '\u{FEAA}']);
    }

    #[test]
    fn visual_order_is_reversed_for_pure_rtl() {
        let vis: Vec<char> = shape_visual("محمد").chars().collect();
        assert_eq!(vis, vec!['\u{FEAA}', '\u{FEE4}', '\u{FEA4}', '\u{FEE3}']);
    }

    #[test]
    fn right_joining_letter_breaks_the_chain() {
        // alef cannot join forward, so the following letter starts fresh:
        // dal-isolated after alef-final after beh-initial ("bad" + alef).
        let joined: Vec<char> = join_presentation_forms("باد").chars().collect();
        assert_eq!(joined, vec!['\u{FE91}', '\u{FE8E}', '\u{FEA9}']);
    }

    #[test]
    fn lam_alef_forms_a_ligature() {
        let joined: Vec<char> = join_presentation_forms("لا").chars().collect();
        assert_eq!(joined, vec!['\u{FEFB}']);

        // Connected variant: beh joins into the ligature's final form.
        let joined: Vec<char> = join_presentation_forms("بلا").chars().collect();
        assert_eq!(joined, vec!['\u{FE91}', '\u{FEFC}']);
    }

    #[test]
    fn hamza_never_joins() {
        // beh before hamza stays isolated; hamza stays isolated.
        let joined: Vec<char> = join_presentation_forms("بء").chars().collect();
        assert_eq!(joined, vec!['\u{FE8F}', '\u{FE80}']);
    }

    #[test]
    fn marks_do_not_interrupt_joining() {
        // beh + fatha + dal: beh still takes its initial form.
        let joined: Vec<char> = join_presentation_forms("بَد").chars().collect();
        assert_eq!(joined, vec!['\u{FE91}', '\u{064E}', '\u{FEAA}']);
    }

    #[test]
    fn spaces_split_joining_groups() {
        let joined = join_presentation_forms("بب بب");
        let got: Vec<char> = joined.chars().collect();
        assert_eq!(
            got,
            vec!['\u{FE91}', '\u{FE90}', ' ', '\u{FE91}', '\u{FE90}']
        );
    }

    #[test]
    fn mixed_text_keeps_ltr_runs_readable() {
        let vis = shape_visual("ab مد cd");
        assert!(vis.starts_with("ab "));
        assert!(vis.ends_with(" cd"));
    }
}
