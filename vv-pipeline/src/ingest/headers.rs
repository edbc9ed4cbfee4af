//! Column-header normalization applied identically to all four inputs.
//!
//! Raw spreadsheet headers arrive with mixed case, accents, punctuation and
//! stray whitespace ("Escritório:", "Prazo SLA "). Joins and required-column
//! checks run against the canonical form produced here: lowercase, accents
//! stripped, every non-alphanumeric character mapped to an underscore, runs
//! collapsed. Leading and trailing underscores are kept; the canonical keys
//! `_processo_id` and `prazo_sla_` depend on them.

/// Normalize one raw header into its canonical key form. Idempotent.
pub fn clean_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        let c = strip_accent(c);
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out
}

fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::clean_header;

    #[test]
    fn lowercases_and_replaces_spaces() {
        assert_eq!(clean_header("Sub Tipo"), "sub_tipo");
    }

    #[test]
    fn strips_accents_and_keeps_trailing_marker() {
        assert_eq!(clean_header("Escritório:"), "escritorio_");
        assert_eq!(clean_header("Prazo SLA "), "prazo_sla_");
    }

    #[test]
    fn keeps_leading_marker() {
        assert_eq!(clean_header("# Processo ID"), "_processo_id");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(clean_header("ID da tarefa:"), "id_da_tarefa_");
        assert_eq!(clean_header("Núcleo -- interno"), "nucleo_interno");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["Escritório:", "Prazo SLA ", "# Processo ID", "npc"] {
            let once = clean_header(raw);
            assert_eq!(clean_header(&once), once);
        }
    }
}
