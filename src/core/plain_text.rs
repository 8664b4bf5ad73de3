//! Plain-text derivation from rich chapter markup

use std::sync::OnceLock;

use regex_lite::Regex;

struct Patterns {
    line_break: Regex,
    paragraph_end: Regex,
    style_block: Regex,
    script_block: Regex,
    tag: Regex,
    blank_run: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        line_break: Regex::new(r"(?i)<br\s*/?>").unwrap(),
        paragraph_end: Regex::new(r"(?i)</p>").unwrap(),
        style_block: Regex::new(r"(?is)<style.*?</style>").unwrap(),
        script_block: Regex::new(r"(?is)<script.*?</script>").unwrap(),
        tag: Regex::new(r"<[^>]+>").unwrap(),
        blank_run: Regex::new(r"\n{3,}").unwrap(),
    })
}

/// Convert rich markup to the plain-text backup form
///
/// Line breaks and paragraph ends become newlines, style/script blocks and
/// tags are dropped, entities are decoded, runs of blank lines collapse to
/// one empty line, and the result ends with exactly one newline.
pub fn to_plain_text(markup: &str) -> String {
    let p = patterns();
    let text = p.line_break.replace_all(markup, "\n");
    let text = p.paragraph_end.replace_all(&text, "\n");
    let text = p.style_block.replace_all(&text, "");
    let text = p.script_block.replace_all(&text, "");
    let text = p.tag.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = p.blank_run.replace_all(&text, "\n\n");

    let mut plain = text
        .trim_end()
        .trim_start_matches(['\n', '\r'])
        .to_string();
    plain.push('\n');
    plain
}

/// Decode named and numeric character references
///
/// Covers every legacy HTML name (the Latin-1 set, which also decodes without
/// a semicolon, e.g. `&eacute` or `&copy2024`) plus common typographic, math,
/// arrow and Greek names. Other names are left as written.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match decode_reference(tail) {
            Some((c, used)) => {
                out.push(c);
                rest = &tail[used..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode the reference at the start of `tail` (just after `&`), returning
/// the char and the number of bytes consumed
fn decode_reference(tail: &str) -> Option<(char, usize)> {
    let with_semicolon = |len: usize| len + usize::from(tail[len..].starts_with(';'));

    if let Some(num) = tail.strip_prefix('#') {
        let (digits, radix, skip) = match num.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (num, 10, 1),
        };
        let len = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..len], radix).ok()?;
        return char::from_u32(code).map(|c| (c, with_semicolon(skip + len)));
    }

    let len = tail
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(tail.len());
    let name = &tail[..len];
    if tail[len..].starts_with(';') {
        if let Some(c) = lookup(LEGACY_ENTITIES, name).or_else(|| lookup(ENTITIES, name)) {
            return Some((c, len + 1));
        }
    }
    // Longest legacy name prefix, as browsers do
    (1..=len)
        .rev()
        .find_map(|end| lookup(LEGACY_ENTITIES, &name[..end]).map(|c| (c, end)))
}

fn lookup(table: &[(&str, char)], name: &str) -> Option<char> {
    table.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

/// Named references that also decode without the trailing semicolon
const LEGACY_ENTITIES: &[(&str, char)] = &[
    ("AElig", '\u{c6}'), ("AMP", '&'), ("Aacute", '\u{c1}'), ("Acirc", '\u{c2}'),
    ("Agrave", '\u{c0}'), ("Aring", '\u{c5}'), ("Atilde", '\u{c3}'), ("Auml", '\u{c4}'),
    ("COPY", '\u{a9}'), ("Ccedil", '\u{c7}'), ("ETH", '\u{d0}'), ("Eacute", '\u{c9}'),
    ("Ecirc", '\u{ca}'), ("Egrave", '\u{c8}'), ("Euml", '\u{cb}'), ("GT", '>'),
    ("Iacute", '\u{cd}'), ("Icirc", '\u{ce}'), ("Igrave", '\u{cc}'), ("Iuml", '\u{cf}'),
    ("LT", '<'), ("Ntilde", '\u{d1}'), ("Oacute", '\u{d3}'), ("Ocirc", '\u{d4}'),
    ("Ograve", '\u{d2}'), ("Oslash", '\u{d8}'), ("Otilde", '\u{d5}'), ("Ouml", '\u{d6}'),
    ("QUOT", '"'), ("REG", '\u{ae}'), ("THORN", '\u{de}'), ("Uacute", '\u{da}'),
    ("Ucirc", '\u{db}'), ("Ugrave", '\u{d9}'), ("Uuml", '\u{dc}'), ("Yacute", '\u{dd}'),
    ("aacute", '\u{e1}'), ("acirc", '\u{e2}'), ("acute", '\u{b4}'), ("aelig", '\u{e6}'),
    ("agrave", '\u{e0}'), ("amp", '&'), ("aring", '\u{e5}'), ("atilde", '\u{e3}'),
    ("auml", '\u{e4}'), ("brvbar", '\u{a6}'), ("ccedil", '\u{e7}'), ("cedil", '\u{b8}'),
    ("cent", '\u{a2}'), ("copy", '\u{a9}'), ("curren", '\u{a4}'), ("deg", '\u{b0}'),
    ("divide", '\u{f7}'), ("eacute", '\u{e9}'), ("ecirc", '\u{ea}'), ("egrave", '\u{e8}'),
    ("eth", '\u{f0}'), ("euml", '\u{eb}'), ("frac12", '\u{bd}'), ("frac14", '\u{bc}'),
    ("frac34", '\u{be}'), ("gt", '>'), ("iacute", '\u{ed}'), ("icirc", '\u{ee}'),
    ("iexcl", '\u{a1}'), ("igrave", '\u{ec}'), ("iquest", '\u{bf}'), ("iuml", '\u{ef}'),
    ("laquo", '\u{ab}'), ("lt", '<'), ("macr", '\u{af}'), ("micro", '\u{b5}'),
    ("middot", '\u{b7}'), ("nbsp", '\u{a0}'), ("not", '\u{ac}'), ("ntilde", '\u{f1}'),
    ("oacute", '\u{f3}'), ("ocirc", '\u{f4}'), ("ograve", '\u{f2}'), ("ordf", '\u{aa}'),
    ("ordm", '\u{ba}'), ("oslash", '\u{f8}'), ("otilde", '\u{f5}'), ("ouml", '\u{f6}'),
    ("para", '\u{b6}'), ("plusmn", '\u{b1}'), ("pound", '\u{a3}'), ("quot", '"'),
    ("raquo", '\u{bb}'), ("reg", '\u{ae}'), ("sect", '\u{a7}'), ("shy", '\u{ad}'),
    ("sup1", '\u{b9}'), ("sup2", '\u{b2}'), ("sup3", '\u{b3}'), ("szlig", '\u{df}'),
    ("thorn", '\u{fe}'), ("times", '\u{d7}'), ("uacute", '\u{fa}'), ("ucirc", '\u{fb}'),
    ("ugrave", '\u{f9}'), ("uml", '\u{a8}'), ("uuml", '\u{fc}'), ("yacute", '\u{fd}'),
    ("yen", '\u{a5}'), ("yuml", '\u{ff}'),
];

/// Named references recognised only with the trailing semicolon
const ENTITIES: &[(&str, char)] = &[
    ("apos", '\u{27}'), ("ensp", '\u{2002}'), ("emsp", '\u{2003}'), ("thinsp", '\u{2009}'),
    ("zwnj", '\u{200c}'), ("zwj", '\u{200d}'), ("lrm", '\u{200e}'), ("rlm", '\u{200f}'),
    ("ndash", '\u{2013}'), ("mdash", '\u{2014}'), ("lsquo", '\u{2018}'), ("rsquo", '\u{2019}'),
    ("sbquo", '\u{201a}'), ("ldquo", '\u{201c}'), ("rdquo", '\u{201d}'), ("bdquo", '\u{201e}'),
    ("dagger", '\u{2020}'), ("Dagger", '\u{2021}'), ("bull", '\u{2022}'), ("hellip", '\u{2026}'),
    ("permil", '\u{2030}'), ("prime", '\u{2032}'), ("Prime", '\u{2033}'), ("lsaquo", '\u{2039}'),
    ("rsaquo", '\u{203a}'), ("oline", '\u{203e}'), ("frasl", '\u{2044}'), ("euro", '\u{20ac}'),
    ("trade", '\u{2122}'), ("larr", '\u{2190}'), ("uarr", '\u{2191}'), ("rarr", '\u{2192}'),
    ("darr", '\u{2193}'), ("harr", '\u{2194}'), ("lArr", '\u{21d0}'), ("rArr", '\u{21d2}'),
    ("hArr", '\u{21d4}'), ("minus", '\u{2212}'), ("lowast", '\u{2217}'), ("infin", '\u{221e}'),
    ("ne", '\u{2260}'), ("le", '\u{2264}'), ("ge", '\u{2265}'), ("asymp", '\u{2248}'),
    ("equiv", '\u{2261}'), ("sum", '\u{2211}'), ("prod", '\u{220f}'), ("radic", '\u{221a}'),
    ("part", '\u{2202}'), ("nabla", '\u{2207}'), ("isin", '\u{2208}'), ("notin", '\u{2209}'),
    ("cap", '\u{2229}'), ("cup", '\u{222a}'), ("int", '\u{222b}'), ("there4", '\u{2234}'),
    ("sim", '\u{223c}'), ("prop", '\u{221d}'), ("ang", '\u{2220}'), ("and", '\u{2227}'),
    ("or", '\u{2228}'), ("loz", '\u{25ca}'), ("spades", '\u{2660}'), ("clubs", '\u{2663}'),
    ("hearts", '\u{2665}'), ("diams", '\u{2666}'), ("OElig", '\u{152}'), ("oelig", '\u{153}'),
    ("Scaron", '\u{160}'), ("scaron", '\u{161}'), ("Yuml", '\u{178}'), ("fnof", '\u{192}'),
    ("circ", '\u{2c6}'), ("tilde", '\u{2dc}'), ("thetasym", '\u{3d1}'), ("upsih", '\u{3d2}'),
    ("piv", '\u{3d6}'), ("Alpha", '\u{391}'), ("Beta", '\u{392}'), ("Gamma", '\u{393}'),
    ("Delta", '\u{394}'), ("Epsilon", '\u{395}'), ("Zeta", '\u{396}'), ("Eta", '\u{397}'),
    ("Theta", '\u{398}'), ("Iota", '\u{399}'), ("Kappa", '\u{39a}'), ("Lambda", '\u{39b}'),
    ("Mu", '\u{39c}'), ("Nu", '\u{39d}'), ("Xi", '\u{39e}'), ("Omicron", '\u{39f}'),
    ("Pi", '\u{3a0}'), ("Rho", '\u{3a1}'), ("Sigma", '\u{3a3}'), ("Tau", '\u{3a4}'),
    ("Upsilon", '\u{3a5}'), ("Phi", '\u{3a6}'), ("Chi", '\u{3a7}'), ("Psi", '\u{3a8}'),
    ("Omega", '\u{3a9}'), ("alpha", '\u{3b1}'), ("beta", '\u{3b2}'), ("gamma", '\u{3b3}'),
    ("delta", '\u{3b4}'), ("epsilon", '\u{3b5}'), ("zeta", '\u{3b6}'), ("eta", '\u{3b7}'),
    ("theta", '\u{3b8}'), ("iota", '\u{3b9}'), ("kappa", '\u{3ba}'), ("lambda", '\u{3bb}'),
    ("mu", '\u{3bc}'), ("nu", '\u{3bd}'), ("xi", '\u{3be}'), ("omicron", '\u{3bf}'),
    ("pi", '\u{3c0}'), ("rho", '\u{3c1}'), ("sigma", '\u{3c3}'), ("tau", '\u{3c4}'),
    ("upsilon", '\u{3c5}'), ("phi", '\u{3c6}'), ("chi", '\u{3c7}'), ("psi", '\u{3c8}'),
    ("omega", '\u{3c9}'), ("sigmaf", '\u{3c2}'),
];
