use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct StatRowProps {
    label: &'static str,
    value: String,
}

#[component]
pub fn StatRow(props: StatRowProps) -> Element {
    rsx! {
        div { class: "flex justify-between items-center",
            span { class: "text-low text-sm", "{props.label}" }
            span { class: "text-high font-mono", "{props.value}" }
        }
    }
}
