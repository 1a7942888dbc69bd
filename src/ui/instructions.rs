use eframe::egui;

use super::app::Theme;

const SECTIONS: &[(&str, &[&str])] = &[
    (
        "🎯 ゲームの目的",
        &[
            "TextWorld は、テキストベースのアドベンチャーゲームです。",
            "プレイヤーは様々なアクションを実行して、ゲームの目標を達成します。",
        ],
    ),
    (
        "👤 手動モード",
        &[
            "画面下部のテキストエリアに短文で指示を入力します",
            "例: 「鍵を探して」「ドアを開けて」「北に進んで」",
            "指示は対応するコマンドに変換され、当てはまらない場合はそのまま送信されます",
            "ゲームログで結果を確認できます",
        ],
    ),
    (
        "🤖 自動モード",
        &[
            "NEXT ボタンをクリックすると、AI が自動で次の行動を決定します",
            "Gemini API が設定されている場合、より賢い判断が可能です",
            "プログレスバーでゲームの進行状況を確認できます",
            "リセットボタンでいつでもゲームをやり直せます",
        ],
    ),
];

const SHORTCUTS: &[(&str, &str)] = &[
    ("Enter", "送信"),
    ("Shift + Enter", "改行"),
    ("Esc", "入力をクリア"),
    ("Ctrl + L", "入力欄にフォーカス"),
];

/// Returns true when the player wants to go back home.
pub fn draw_instructions(ctx: &egui::Context, theme: &Theme) -> bool {
    let mut back = false;

    egui::TopBottomPanel::top("instructions_header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("⬅").clicked() {
                back = true;
            }
            ui.heading(egui::RichText::new("操作説明").color(theme.primary));
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (title, lines) in SECTIONS {
                ui.add_space(10.0);
                ui.label(egui::RichText::new(*title).strong().color(theme.primary));
                for line in *lines {
                    ui.label(format!("• {line}"));
                }
            }

            ui.add_space(10.0);
            ui.label(egui::RichText::new("⌨ キーボードショートカット").strong().color(theme.primary));
            egui::Grid::new("shortcuts").num_columns(2).show(ui, |ui| {
                for (key, what) in SHORTCUTS {
                    ui.label(egui::RichText::new(*key).monospace().color(theme.secondary));
                    ui.label(*what);
                    ui.end_row();
                }
            });

            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                if ui.button("ホームに戻る").clicked() {
                    back = true;
                }
            });
        });
    });

    back
}
