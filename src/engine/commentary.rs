//! # engine::commentary
//!
//! Templated "AI analysis" for the dashboard cards. Deterministic: the same
//! percent change and volume always produce the same block.
//!
//! ```text
//! pct >  0.5  ─▶ Bullish
//! pct < -0.5  ─▶ Bearish
//! otherwise   ─▶ Neutral
//! ```

use crate::models::{CommentaryBlock, Opinion, Opinions};

pub const BULLISH_THRESHOLD: f64 = 0.5;
pub const BEARISH_THRESHOLD: f64 = -0.5;

/// 20,000 lots.
pub const HEAVY_VOLUME_SHARES: u64 = 20_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

impl Sentiment {
    pub fn from_pct(pct: f64) -> Self {
        if pct > BULLISH_THRESHOLD {
            Self::Bullish
        } else if pct < BEARISH_THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Persona {
    Gemini,
    Gpt,
    DeepSeek,
}

impl Persona {
    fn name(self) -> &'static str {
        match self {
            Persona::Gemini => "Gemini",
            Persona::Gpt => "GPT-4o",
            Persona::DeepSeek => "DeepSeek",
        }
    }

    fn score(self, sentiment: Sentiment) -> u8 {
        match (sentiment, self) {
            (Sentiment::Bullish, Persona::Gemini) => 85,
            (Sentiment::Bullish, Persona::Gpt) => 80,
            (Sentiment::Bullish, Persona::DeepSeek) => 75,
            (Sentiment::Neutral, Persona::Gemini) => 55,
            (Sentiment::Neutral, Persona::Gpt) => 50,
            (Sentiment::Neutral, Persona::DeepSeek) => 60,
            (Sentiment::Bearish, Persona::Gemini) => 30,
            (Sentiment::Bearish, Persona::Gpt) => 35,
            (Sentiment::Bearish, Persona::DeepSeek) => 40,
        }
    }

    fn view(self, sentiment: Sentiment) -> &'static str {
        match (sentiment, self) {
            (Sentiment::Bullish, Persona::DeepSeek) => "多方佔優",
            (Sentiment::Bullish, _) => "偏多",
            (Sentiment::Neutral, Persona::DeepSeek) => "區間整理",
            (Sentiment::Neutral, _) => "觀望",
            (Sentiment::Bearish, Persona::DeepSeek) => "空方佔優",
            (Sentiment::Bearish, _) => "偏空",
        }
    }

    fn desc(self, sentiment: Sentiment, pct: f64, heavy: bool) -> String {
        let volume_note = if heavy { "成交量明顯放大" } else { "成交量溫和" };
        match (self, sentiment) {
            (Persona::Gemini, Sentiment::Bullish) => {
                format!("今日上漲 {pct:.2}%，{volume_note}，短線動能轉強，可留意回測支撐後的布局機會。")
            }
            (Persona::Gemini, Sentiment::Neutral) => {
                format!("今日漲跌 {pct:+.2}%，{volume_note}，價格於平盤附近整理，等待方向表態。")
            }
            (Persona::Gemini, Sentiment::Bearish) => {
                format!("今日下跌 {:.2}%，{volume_note}，短線賣壓沉重，宜嚴設停損。", pct.abs())
            }
            (Persona::Gpt, Sentiment::Bullish) => {
                format!("漲幅 {pct:.2}% 高於門檻，{volume_note}，趨勢偏多但需留意追高風險。")
            }
            (Persona::Gpt, Sentiment::Neutral) => {
                format!("漲跌幅 {pct:+.2}% 未達門檻，{volume_note}，建議觀望等待訊號確認。")
            }
            (Persona::Gpt, Sentiment::Bearish) => {
                format!("跌幅 {:.2}% 超過門檻，{volume_note}，趨勢轉弱，建議降低持股。", pct.abs())
            }
            (Persona::DeepSeek, Sentiment::Bullish) => {
                if heavy {
                    "價漲量增，籌碼面配合良好，多方力道延續機率高。".to_string()
                } else {
                    "價漲量縮，上攻力道有待成交量確認。".to_string()
                }
            }
            (Persona::DeepSeek, Sentiment::Neutral) => {
                "多空力道均衡，短線以區間操作為主。".to_string()
            }
            (Persona::DeepSeek, Sentiment::Bearish) => {
                if heavy {
                    "價跌量增，賣壓湧現，留意是否跌破前低。".to_string()
                } else {
                    "價跌量縮，賣壓有限，可觀察是否止跌。".to_string()
                }
            }
        }
    }

    fn opinion(self, sentiment: Sentiment, pct: f64, heavy: bool) -> Opinion {
        Opinion {
            name:  self.name().to_string(),
            view:  self.view(sentiment).to_string(),
            desc:  self.desc(sentiment, pct, heavy),
            score: self.score(sentiment),
        }
    }
}

fn summary(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Bullish => "三大模型一致偏多：今日走勢強勁，短線可偏多操作，惟仍需控制部位與停損。",
        Sentiment::Neutral => "三大模型看法中性：股價窄幅整理，建議耐心等待突破訊號再行動。",
        Sentiment::Bearish => "三大模型一致偏空：今日走勢疲弱，建議保守因應、避免過早攤平。",
    }
}

/// Builds the `aiAnalysis` block from the quote's percent change and volume.
pub fn derive_commentary(pct: f64, volume: u64) -> CommentaryBlock {
    let pct = if pct.is_finite() { pct } else { 0.0 };
    let sentiment = Sentiment::from_pct(pct);
    let heavy = volume >= HEAVY_VOLUME_SHARES;

    CommentaryBlock {
        opinions: Opinions {
            gemini:   Persona::Gemini.opinion(sentiment, pct, heavy),
            gpt:      Persona::Gpt.opinion(sentiment, pct, heavy),
            deepseek: Persona::DeepSeek.opinion(sentiment, pct, heavy),
        },
        summary: summary(sentiment).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsmc_gain_is_bullish_for_every_persona() {
        // 2330.TW: price 578.00, change +5.00, pct +0.87
        let block = derive_commentary(0.87, 25_000_000);
        let o = &block.opinions;

        assert_eq!(o.gemini.view, "偏多");
        assert_eq!(o.gpt.view, "偏多");
        assert_eq!(o.deepseek.view, "多方佔優");
        assert_eq!((o.gemini.score, o.gpt.score, o.deepseek.score), (85, 80, 75));
        assert!(o.gemini.desc.contains("0.87%"));
        assert!(o.deepseek.desc.contains("價漲量增"));
        assert!(block.summary.contains("偏多"));
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(Sentiment::from_pct(0.5), Sentiment::Neutral);
        assert_eq!(Sentiment::from_pct(-0.5), Sentiment::Neutral);
        assert_eq!(Sentiment::from_pct(0.51), Sentiment::Bullish);
        assert_eq!(Sentiment::from_pct(-0.51), Sentiment::Bearish);
    }

    #[test]
    fn bearish_desc_reports_absolute_change() {
        let block = derive_commentary(-1.25, 1_000);
        assert_eq!(block.opinions.gpt.view, "偏空");
        assert!(block.opinions.gemini.desc.contains("下跌 1.25%"));
        assert!(block.opinions.deepseek.desc.contains("價跌量縮"));
        assert!(block.summary.contains("偏空"));
    }

    #[test]
    fn scores_stay_in_range_and_output_is_deterministic() {
        for pct in [-9.9, -0.6, 0.0, 0.3, 0.6, 9.9, f64::NAN] {
            let a = derive_commentary(pct, 10);
            let b = derive_commentary(pct, 10);
            assert_eq!(a, b);
            for op in [&a.opinions.gemini, &a.opinions.gpt, &a.opinions.deepseek] {
                assert!(op.score <= 100);
            }
        }
    }
}
