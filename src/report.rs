use crate::domain::Report;

pub fn render(report: &Report) -> [String; 2] {
    let liked = if report.liked.is_empty() {
        "Hikers did not have any common likes about this hike.".to_string()
    } else {
        format!("Hikers liked this stuff: {}", report.liked.join(", "))
    };
    let disliked = if report.disliked.is_empty() {
        "Hikers did not have any common dislikes about this hike.".to_string()
    } else {
        format!("Hikers disliked this stuff: {}", report.disliked.join(", "))
    };
    [liked, disliked]
}
