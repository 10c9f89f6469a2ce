/// Display form of an item, machine or recipe name.
///
/// `transport_belt` becomes `Transport Belt`.
pub fn format_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::format_name;

    #[test]
    fn underscores_become_title_case_words() {
        assert_eq!(format_name("transport_belt"), "Transport Belt");
        assert_eq!(format_name("ASSEMBLING_machine_2"), "Assembling Machine 2");
        assert_eq!(format_name("gear"), "Gear");
    }
}
