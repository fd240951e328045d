//! PostScript string identifiers.

/// Number of strings in the predefined standard set.
pub const STANDARD_STRING_COUNT: usize = 391;

/// PostScript string identifier (SID).
///
/// Identifiers below [`STANDARD_STRING_COUNT`] name one of the standard
/// strings. The rest index the font's String INDEX.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct StringId(u16);

impl StringId {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// Resolves the identifier as a standard string.
    ///
    /// Returns `Err(index)` with the String INDEX entry to use when the
    /// identifier is not a standard string.
    pub fn standard_string(self) -> Result<Latin1String<'static>, usize> {
        let ix = self.0 as usize;
        if ix < STANDARD_STRING_COUNT {
            STANDARD_STRINGS
                .split_ascii_whitespace()
                .nth(ix)
                .map(|name| Latin1String::new(name.as_bytes()))
                .ok_or(ix)
        } else {
            Err(ix - STANDARD_STRING_COUNT)
        }
    }
}

impl From<i32> for StringId {
    fn from(value: i32) -> Self {
        Self::new(value as u16)
    }
}

/// Reference to a Latin-1 encoded string.
///
/// Strings in CFF fonts are usually ASCII but are technically Latin-1, so
/// each byte is a character.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Latin1String<'a> {
    chars: &'a [u8],
}

impl<'a> Latin1String<'a> {
    pub const fn new(chars: &'a [u8]) -> Self {
        Self { chars }
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + Clone + 'a {
        self.chars.iter().map(|b| *b as char)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.chars
    }
}

impl PartialEq<&str> for Latin1String<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.chars().eq(other.chars())
    }
}

impl std::fmt::Display for Latin1String<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.chars().try_for_each(|ch| write!(f, "{ch}"))
    }
}

/// "Appendix A - Standard Strings" of the CFF specification, in SID order.
///
/// See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=29>
const STANDARD_STRINGS: &str = "
    .notdef space exclam quotedbl numbersign dollar percent ampersand quoteright
    parenleft parenright asterisk plus comma hyphen period slash zero one two
    three four five six seven eight nine colon semicolon less equal greater
    question at A B C D E F G H I J K L M N O P Q R S T U V W X Y Z bracketleft
    backslash bracketright asciicircum underscore quoteleft a b c d e f g h i j
    k l m n o p q r s t u v w x y z braceleft bar braceright asciitilde
    exclamdown cent sterling fraction yen florin section currency quotesingle
    quotedblleft guillemotleft guilsinglleft guilsinglright fi fl endash dagger
    daggerdbl periodcentered paragraph bullet quotesinglbase quotedblbase
    quotedblright guillemotright ellipsis perthousand questiondown grave acute
    circumflex tilde macron breve dotaccent dieresis ring cedilla hungarumlaut
    ogonek caron emdash AE ordfeminine Lslash Oslash OE ordmasculine ae dotlessi
    lslash oslash oe germandbls onesuperior logicalnot mu trademark Eth onehalf
    plusminus Thorn onequarter divide brokenbar degree thorn threequarters
    twosuperior registered minus eth multiply threesuperior copyright Aacute
    Acircumflex Adieresis Agrave Aring Atilde Ccedilla Eacute Ecircumflex
    Edieresis Egrave Iacute Icircumflex Idieresis Igrave Ntilde Oacute
    Ocircumflex Odieresis Ograve Otilde Scaron Uacute Ucircumflex Udieresis
    Ugrave Yacute Ydieresis Zcaron aacute acircumflex adieresis agrave aring
    atilde ccedilla eacute ecircumflex edieresis egrave iacute icircumflex
    idieresis igrave ntilde oacute ocircumflex odieresis ograve otilde scaron
    uacute ucircumflex udieresis ugrave yacute ydieresis zcaron exclamsmall
    Hungarumlautsmall dollaroldstyle dollarsuperior ampersandsmall Acutesmall
    parenleftsuperior parenrightsuperior twodotenleader onedotenleader
    zerooldstyle oneoldstyle twooldstyle threeoldstyle fouroldstyle fiveoldstyle
    sixoldstyle sevenoldstyle eightoldstyle nineoldstyle commasuperior
    threequartersemdash periodsuperior questionsmall asuperior bsuperior
    centsuperior dsuperior esuperior isuperior lsuperior msuperior nsuperior
    osuperior rsuperior ssuperior tsuperior ff ffi ffl parenleftinferior
    parenrightinferior Circumflexsmall hyphensuperior Gravesmall Asmall Bsmall
    Csmall Dsmall Esmall Fsmall Gsmall Hsmall Ismall Jsmall Ksmall Lsmall Msmall
    Nsmall Osmall Psmall Qsmall Rsmall Ssmall Tsmall Usmall Vsmall Wsmall Xsmall
    Ysmall Zsmall colonmonetary onefitted rupiah Tildesmall exclamdownsmall
    centoldstyle Lslashsmall Scaronsmall Zcaronsmall Dieresissmall Brevesmall
    Caronsmall Dotaccentsmall Macronsmall figuredash hypheninferior Ogoneksmall
    Ringsmall Cedillasmall questiondownsmall oneeighth threeeighths fiveeighths
    seveneighths onethird twothirds zerosuperior foursuperior fivesuperior
    sixsuperior sevensuperior eightsuperior ninesuperior zeroinferior
    oneinferior twoinferior threeinferior fourinferior fiveinferior sixinferior
    seveninferior eightinferior nineinferior centinferior dollarinferior
    periodinferior commainferior Agravesmall Aacutesmall Acircumflexsmall
    Atildesmall Adieresissmall Aringsmall AEsmall Ccedillasmall Egravesmall
    Eacutesmall Ecircumflexsmall Edieresissmall Igravesmall Iacutesmall
    Icircumflexsmall Idieresissmall Ethsmall Ntildesmall Ogravesmall Oacutesmall
    Ocircumflexsmall Otildesmall Odieresissmall OEsmall Oslashsmall Ugravesmall
    Uacutesmall Ucircumflexsmall Udieresissmall Yacutesmall Thornsmall
    Ydieresissmall 001.000 001.001 001.002 001.003 Black Bold Book Light Medium
    Regular Roman Semibold
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_is_complete() {
        assert_eq!(
            STANDARD_STRINGS.split_ascii_whitespace().count(),
            STANDARD_STRING_COUNT
        );
    }

    #[test]
    fn standard_strings() {
        let cases = [(0, ".notdef"), (1, "space"), (34, "A"), (390, "Semibold")];
        for (sid, expected) in cases {
            let string = StringId::new(sid).standard_string().unwrap();
            assert_eq!(string, expected);
            assert_eq!(string.to_string(), expected);
        }
    }

    #[test]
    fn custom_strings() {
        assert_eq!(StringId::new(391).standard_string(), Err(0));
        assert_eq!(StringId::new(400).standard_string(), Err(9));
    }

    #[test]
    fn latin1_chars() {
        let s = Latin1String::new(&[0x43, 0x61, 0x66, 0xe9]);
        assert_eq!(s, "Caf\u{e9}");
    }
}
