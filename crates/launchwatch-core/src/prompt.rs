/// Default search task handed to the browser-automation service.
///
/// Kept deliberately small: short tasks finish inside the service's step
/// budget far more reliably, and the extraction pipeline copes with partial
/// output anyway. The output contract at the bottom matches
/// [`crate::ProductRecord`] field for field.
pub const DEFAULT_SEARCH_PROMPT: &str = r#"You are an AI Product Discovery Expert. Find 2-3 newly launched AI products from startups on https://nitter.privacyredirect.com/ within the last 30 days.

Quick Search Strategy:
- Search: "AI app" launch -from:Google -from:Microsoft -from:OpenAI
- Find posts with product links (websites, demos)
- Extract only essential information

For each product found:
- name: Product name
- description: Brief description (max 20 words)
- url: Product website/demo link
- category: 'Text Generation', 'Image Generation', 'Audio Generation', 'Social/Entertainment', 'Productivity', 'Design', 'DevOps', or 'Other'
- metrics: {likes, retweets, replies}
- post_url: Nitter post link

Output JSON:
{
  "products": [
    {
      "name": "...",
      "description": "...",
      "url": "...",
      "category": "...",
      "metrics": {"likes": 0, "retweets": 0, "replies": 0},
      "post_url": "https://nitter.privacyredirect.com/..."
    }
  ]
}

Keep it simple: Find 2-3 products maximum to complete task quickly."#;
