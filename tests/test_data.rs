// Feed and page fixtures for sweep integration tests.
// `{base}` is replaced with the mock server URI before serving.

#![allow(dead_code)]

pub const WORLD_NEWS_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
    <channel>
        <title>World News</title>
        <description>Top stories</description>
        <link>{base}</link>

        <item>
            <title>Summit opens in Bangkok</title>
            <link>{base}/world/summit</link>
            <description><![CDATA[Leaders <b>gather</b> for talks.]]></description>
            <pubDate>Mon, 01 Jan 2024 10:00:00 +0700</pubDate>
        </item>

        <item>
            <title>Markets rally &amp;amp; close higher</title>
            <link>{base}/world/markets</link>
            <description>Stocks rose.</description>
            <pubDate>Mon, 01 Jan 2024 02:30:00 GMT</pubDate>
        </item>

        <item>
            <title>Rail strike called off</title>
            <link>{base}/world/rail</link>
            <description>Unions agree.</description>
            <pubDate>Mon, 01 Jan 2024 01:00:00 GMT</pubDate>
        </item>

        <item>
            <title>Fourth story never examined</title>
            <link>{base}/world/fourth</link>
            <description>Beyond the per-feed limit.</description>
            <pubDate>Sun, 31 Dec 2023 23:00:00 GMT</pubDate>
        </item>
    </channel>
</rss>"#;

pub const LOCAL_NEWS_ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Local Desk</title>
    <id>{base}/local</id>
    <updated>2024-01-02T00:00:00Z</updated>

    <entry>
        <title>Summit opens in Bangkok</title>
        <link href="{base}/local/summit-copy"/>
        <id>{base}/local/summit-copy</id>
        <updated>2024-01-01T04:00:00Z</updated>
        <published>2024-01-01T04:00:00Z</published>
        <summary>Syndicated copy of the summit story.</summary>
    </entry>

    <entry>
        <title>Night market reopens</title>
        <link href="{base}/local/market"/>
        <id>{base}/local/market</id>
        <updated>2024-01-01T20:00:00+07:00</updated>
        <published>2024-01-01T20:00:00+07:00</published>
        <summary>Vendors return.</summary>
    </entry>
</feed>"#;

/// Page with a small JPEG first and a large one second.
pub const PAGE_WITH_IMAGES: &str = r#"<html><body>
    <img src="{base}/img/thumb.jpg">
    <img src="/relative/ignored.jpg">
    <img src="{base}/img/lead.jpeg">
</body></html>"#;

pub const PAGE_WITHOUT_IMAGES: &str = r#"<html><body><p>Text only.</p><img src="{base}/img/logo.png"></body></html>"#;

pub fn with_base(template: &str, base: &str) -> String {
    template.replace("{base}", base)
}
