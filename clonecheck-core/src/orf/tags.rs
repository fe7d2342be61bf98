//! Built-in affinity tags, protease sites and linkers that are recognised
//! next to a placed ORF.

use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TagKind {
    Tag,
    Linker,
}

impl TagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::Tag => "tag",
            TagKind::Linker => "linker",
        }
    }
}

#[derive(Debug)]
pub struct TagDef {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: TagKind,
    pub sequences: &'static [&'static str],
    pub description: &'static str,
}

static TAG_LIBRARY: [TagDef; 14] = [
    TagDef {
        id: "his6",
        name: "His6",
        kind: TagKind::Tag,
        sequences: &["HHHHHH"],
        description: "Polyhistidine tag for Ni-NTA purification.",
    },
    TagDef {
        id: "his10",
        name: "His10",
        kind: TagKind::Tag,
        sequences: &["HHHHHHHHHH"],
        description: "Extended polyhistidine tag for stronger binding.",
    },
    TagDef {
        id: "nhis6_tev",
        name: "N-His6-TEV",
        kind: TagKind::Tag,
        sequences: &["MGSSHHHHHHENLYFQSNA"],
        description: "N-terminal His6 tag followed by a TEV protease cleavage site.",
    },
    TagDef {
        id: "nhis6_mbp_n10_tev",
        name: "N-His6-MBP-N10-TEV",
        kind: TagKind::Tag,
        sequences: &["MGSSHHHHHHGSSMKIEEGKLVIWINGDKGYNGLAEVGKKFEKDTGIKVTVEHPDKLEEKFPQVAATGDGPDIIFWAHDRFGGYAQSGLLAEITPDKAFQDKLYPFTWDAVRYNGKLIAYPIAVEALSLIYNKDLLPNPPKTWEEIPALDKELKAKGKSALMFNLQEPYFTWPLIAADGGYAFKYENGKYDIKDVGVDNAGAKAGLTFLVDLIKNKHMNADTDYSIAEAAFNKGETAMTINGPWAWSNIDTSKVNYGVTVLPTFKGQPSKPFVGVLSAGINAASPNKELAKEFLENYLLTDEGLEAVNKDKPLGAVALKSYEEELAKDPRIAATMENAQKGEIMPNIPQMSAFWYAVRTAVINAASGRQTVDEALKDAQTNSSSNNNNNNNNNNLGIEENLYFQSNA"],
        description: "Fusion of N-terminal His6, MBP solubility tag, N10 linker, and TEV protease cleavage site.",
    },
    TagDef {
        id: "strepII",
        name: "StrepII",
        kind: TagKind::Tag,
        sequences: &["WSHPQFEK"],
        description: "Strep-Tactin affinity tag.",
    },
    TagDef {
        id: "flag",
        name: "FLAG",
        kind: TagKind::Tag,
        sequences: &["DYKDDDDK"],
        description: "FLAG epitope tag.",
    },
    TagDef {
        id: "ha",
        name: "HA",
        kind: TagKind::Tag,
        sequences: &["YPYDVPDYA"],
        description: "Hemagglutinin epitope tag.",
    },
    TagDef {
        id: "myc",
        name: "Myc",
        kind: TagKind::Tag,
        sequences: &["EQKLISEEDL"],
        description: "c-Myc epitope tag.",
    },
    TagDef {
        id: "tev",
        name: "TEV site",
        kind: TagKind::Tag,
        sequences: &["ENLYFQG"],
        description: "TEV protease cleavage site.",
    },
    TagDef {
        id: "hrv3c",
        name: "HRV 3C site",
        kind: TagKind::Tag,
        sequences: &["LEVLFQGP"],
        description: "Human rhinovirus 3C protease site.",
    },
    TagDef {
        id: "sumo",
        name: "SUMO",
        kind: TagKind::Tag,
        sequences: &["MRGSHHHHHHGSMGGSMKQTLKETGGGSGGGGSGTLVSTGGSEEDK"],
        description: "SUMO fusion to enhance solubility.",
    },
    TagDef {
        id: "ggggs",
        name: "GGGGS",
        kind: TagKind::Linker,
        sequences: &["GGGGS"],
        description: "Flexible glycine-serine linker.",
    },
    TagDef {
        id: "ggggs2",
        name: "(GGGGS)2",
        kind: TagKind::Linker,
        sequences: &["GGGGSGGGGS"],
        description: "Two repeats of the flexible linker.",
    },
    TagDef {
        id: "ggggs3",
        name: "(GGGGS)3",
        kind: TagKind::Linker,
        sequences: &["GGGGSGGGGSGGGGS"],
        description: "Three repeats of the flexible linker.",
    },
];

pub fn tag_library() -> &'static [TagDef] {
    &TAG_LIBRARY
}

/// One searchable sequence of a library entry. Entries carrying several
/// sequences expose them as `id-1`, `id-2`, ...
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagCandidate {
    pub id: String,
    pub name: &'static str,
    pub kind: TagKind,
    pub sequence: &'static [u8],
}

static CANDIDATES: LazyLock<Vec<TagCandidate>> = LazyLock::new(|| {
    let mut out = Vec::new();
    for def in TAG_LIBRARY.iter() {
        for (i, seq) in def.sequences.iter().enumerate() {
            if seq.is_empty() {
                continue;
            }
            let id = if def.sequences.len() == 1 {
                def.id.to_string()
            } else {
                format!("{}-{}", def.id, i + 1)
            };
            out.push(TagCandidate {
                id,
                name: def.name,
                kind: def.kind,
                sequence: seq.as_bytes(),
            });
        }
    }
    out
});

pub fn tag_candidates() -> &'static [TagCandidate] {
    &CANDIDATES
}

/// Longest candidate ending exactly at `position` of `translation`.
pub fn find_prefix_tag(translation: &[u8], position: usize) -> Option<&'static TagCandidate> {
    let mut best: Option<&'static TagCandidate> = None;
    for cand in CANDIDATES.iter() {
        let len = cand.sequence.len();
        if position < len || position > translation.len() {
            continue;
        }
        if &translation[position - len..position] == cand.sequence
            && best.map_or(true, |b| len > b.sequence.len())
        {
            best = Some(cand);
        }
    }
    best
}

/// Longest candidate starting exactly at `position` of `translation`.
pub fn find_suffix_tag(translation: &[u8], position: usize) -> Option<&'static TagCandidate> {
    let mut best: Option<&'static TagCandidate> = None;
    for cand in CANDIDATES.iter() {
        let len = cand.sequence.len();
        if position + len > translation.len() {
            continue;
        }
        if &translation[position..position + len] == cand.sequence
            && best.map_or(true, |b| len > b.sequence.len())
        {
            best = Some(cand);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabets::protein;

    #[test]
    fn library_is_complete_and_valid() {
        assert_eq!(tag_library().len(), 14);
        let alphabet = protein::alphabet();
        for def in tag_library() {
            for seq in def.sequences {
                assert!(alphabet.is_word(seq.as_bytes()), "{}", def.id);
            }
        }
        assert_eq!(tag_candidates().len(), 14);
        assert_eq!(
            tag_library().iter().filter(|d| d.kind == TagKind::Linker).count(),
            3
        );
    }

    #[test]
    fn prefix_prefers_longest() {
        let translation = b"MGSSHHHHHHENLYFQSNAPEPTIDE";
        assert_eq!(find_prefix_tag(translation, 19).map(|t| t.id.as_str()), Some("nhis6_tev"));
        assert_eq!(find_prefix_tag(translation, 10).map(|t| t.id.as_str()), Some("his6"));
        assert!(find_prefix_tag(translation, 3).is_none());
    }

    #[test]
    fn suffix_prefers_longest() {
        let translation = b"PEPTIDEGGGGSGGGGSK";
        let tag = find_suffix_tag(translation, 7).map(|t| t.id.as_str());
        assert_eq!(tag, Some("ggggs2"));
        assert!(find_suffix_tag(translation, 8).is_none());
        assert!(find_suffix_tag(translation, 40).is_none());
    }
}
